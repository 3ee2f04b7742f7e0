/// Category entity module
pub mod category;
/// Product entity module
pub mod product;

pub use category::Entity as Category;
pub use product::Entity as Product;
