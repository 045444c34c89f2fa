pub mod dat;
pub mod error;
pub mod index;
pub mod normalize;

pub use dat::{DatFile, DatGame, DatRom, parse_dat, parse_dat_file};
pub use error::DatError;
pub use index::{CatalogEntry, CoverIndex};
pub use normalize::{Normalizer, generate_keys, normalize_file_name, normalize_name};
