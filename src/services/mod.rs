pub mod features;
pub mod fuzzy;
pub mod providers;
pub mod ranking;
pub mod recommendations;
pub mod title_search;
pub mod vector_space;

pub use providers::{MovieDbProvider, TmdbClient};
pub use recommendations::{Recommender, VectorSource};
pub use title_search::TitleResolver;
