pub mod customer;
pub mod gallery_item;
pub mod notification;
pub mod offer;
pub mod order;
pub mod order_item;
pub mod product;
pub mod store_setting;
pub mod user;

pub use customer::Entity as Customer;
pub use gallery_item::Entity as GalleryItem;
pub use notification::Entity as Notification;
pub use offer::Entity as Offer;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
pub use product::Entity as Product;
pub use store_setting::Entity as StoreSetting;
pub use user::Entity as User;
