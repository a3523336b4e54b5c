pub mod errors;
pub mod db;
pub mod shop_state;
pub mod area;
pub mod shop_category;
pub mod shop;

#[cfg(test)]
mod tests;
