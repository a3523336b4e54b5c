pub mod seaorm;

pub use seaorm::{SeaOrmShopRepository, SeaOrmShopTransaction};
