pub mod data_paths;
pub mod export;
pub mod inspect;
pub mod showdown;
