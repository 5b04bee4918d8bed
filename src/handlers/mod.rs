pub mod auth;
pub mod common;
pub mod gallery;
pub mod health;
pub mod offers;
pub mod orders;
pub mod products;
pub mod profile;
pub mod settings;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    GalleryService, OfferService, OrderService, ProductService, ProfileService, SettingsService,
};

/// Business-logic layer shared by every handler.
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub orders: Arc<OrderService>,
    pub gallery: Arc<GalleryService>,
    pub settings: Arc<SettingsService>,
    pub profile: Arc<ProfileService>,
    pub offers: Arc<OfferService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        default_customer_password: String,
    ) -> Self {
        Self {
            products: Arc::new(ProductService::new(db.clone())),
            orders: Arc::new(OrderService::new(
                db.clone(),
                Some(event_sender),
                default_customer_password,
            )),
            gallery: Arc::new(GalleryService::new(db.clone())),
            settings: Arc::new(SettingsService::new(db.clone())),
            profile: Arc::new(ProfileService::new(db.clone())),
            offers: Arc::new(OfferService::new(db)),
        }
    }
}
