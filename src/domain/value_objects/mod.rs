pub mod amount;
pub mod price;
pub mod quantity;
pub mod text;
