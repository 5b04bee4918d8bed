use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use tracing::info;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::db::DbPool;
use crate::entities::{gallery_item, product, user};
use crate::errors::ServiceError;

/// Populates the catalog, gallery and the admin login on a fresh database.
/// Skipped entirely when any product already exists, so restarts never
/// duplicate rows.
pub async fn seed_if_empty(db: &DbPool, admin_password: &str) -> Result<(), ServiceError> {
    let existing = product::Entity::find().count(db).await?;
    if existing > 0 {
        info!(products = existing, "database already seeded, skipping");
        return Ok(());
    }

    seed_products(db).await?;
    seed_gallery(db).await?;
    seed_admin_user(db, admin_password).await?;

    info!("seeded catalog, gallery and admin credential");
    Ok(())
}

struct ProductSeed {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    category: &'static str,
    stock: i32,
    emoji: &'static str,
    est_year: i32,
}

async fn seed_products(db: &DbPool) -> Result<(), ServiceError> {
    let rows = [
        ProductSeed {
            name: "Baklava Royale",
            description: "Layers of delicate phyllo, honey from the highlands, and pistachios.",
            price: dec!(12.00),
            category: "Traditional",
            stock: 100,
            emoji: "🥮",
            est_year: 1850,
        },
        ProductSeed {
            name: "Rose Petal Muffin",
            description: "Infused with Damascus rose water and topped with crystallized petals.",
            price: dec!(8.00),
            category: "Specialty",
            stock: 89,
            emoji: "🧁",
            est_year: 1920,
        },
        ProductSeed {
            name: "Golden Croissant",
            description: "72 layers of pure butter pastry, folded by hand.",
            price: dec!(6.50),
            category: "French",
            stock: 234,
            emoji: "🥐",
            est_year: 1780,
        },
        ProductSeed {
            name: "Saffron Ring",
            description: "Persian saffron glaze over pillowy dough.",
            price: dec!(7.50),
            category: "Persian",
            stock: 12,
            emoji: "🍩",
            est_year: 1900,
        },
        ProductSeed {
            name: "Ma'amoul Legacy",
            description: "Date-filled shortbread pressed in antique wooden molds.",
            price: dec!(9.00),
            category: "Levantine",
            stock: 50,
            emoji: "🍪",
            est_year: 1875,
        },
        ProductSeed {
            name: "Heritage Torte",
            description: "Seven layers of history, each representing a generation.",
            price: dec!(45.00),
            category: "Celebration",
            stock: 8,
            emoji: "🎂",
            est_year: 1800,
        },
    ];

    for row in rows {
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(row.name.to_string()),
            description: Set(Some(row.description.to_string())),
            price: Set(row.price),
            category: Set(Some(row.category.to_string())),
            stock: Set(row.stock),
            emoji: Set(Some(row.emoji.to_string())),
            image_url: Set(None),
            est_year: Set(Some(row.est_year)),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

struct GallerySeed {
    url: &'static str,
    media_type: gallery_item::MediaType,
    title: &'static str,
    description: &'static str,
    thumbnail_url: Option<&'static str>,
}

async fn seed_gallery(db: &DbPool) -> Result<(), ServiceError> {
    use gallery_item::MediaType::{Image, Video};

    let rows = [
        GallerySeed {
            url: "/images/media/media.jpg",
            media_type: Image,
            title: "Traditional Preparation",
            description: "Expertly crafting Makroudh using traditional methods.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/media2.jpg",
            media_type: Image,
            title: "Golden Makroudh",
            description: "Our signature honey-dipped golden semolina pastry.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/media3.jpg",
            media_type: Image,
            title: "Almond Variety",
            description: "Premium Makroudh filled with crushed almonds.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/media4.jpg",
            media_type: Image,
            title: "Sesame Coating",
            description: "Traditional recipe topped with toasted sesame seeds.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/media5.jpg",
            media_type: Image,
            title: "Baking Process",
            description: "Freshly baked and ready for the honey bath.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/media9.jpg",
            media_type: Image,
            title: "Gift Selection",
            description: "Beautifully arranged gift boxes for special occasions.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/media10.jpg",
            media_type: Image,
            title: "Detailed Texture",
            description: "A close look at the intricate patterns of our Makroudh.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/post1.jpg",
            media_type: Image,
            title: "Customer Favorite",
            description: "One of our most popular varieties among locals.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/happy_new_year.jpg",
            media_type: Image,
            title: "Celebration Specials",
            description: "Limited edition boxes for festive seasons.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/media11.jpg",
            media_type: Image,
            title: "Workshop View",
            description: "Where the magic happens in Kairouan.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "https://www.youtube.com/embed/dQw4w9WgXcQ",
            media_type: Video,
            title: "The Art of Makroudh",
            description: "A short documentary about our history.",
            thumbnail_url: Some("/images/media/media6.jpg"),
        },
        GallerySeed {
            url: "https://www.facebook.com/makroudhomrani/videos/10158234567890123/",
            media_type: Video,
            title: "Traditional Kairouan Makroudh",
            description: "See how we prepare our legendary Makroudh Omrani.",
            thumbnail_url: Some("/images/media/media7.jpg"),
        },
        GallerySeed {
            url: "/images/media/post2.jpg",
            media_type: Image,
            title: "Fresh Batch",
            description: "A fresh batch of Makroudh cooling down.",
            thumbnail_url: None,
        },
        GallerySeed {
            url: "/images/media/post3.jpg",
            media_type: Image,
            title: "Packaging",
            description: "Carefully packing orders for our customers.",
            thumbnail_url: None,
        },
    ];

    for row in rows {
        gallery_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            url: Set(row.url.to_string()),
            media_type: Set(row.media_type),
            title: Set(row.title.to_string()),
            description: Set(Some(row.description.to_string())),
            thumbnail_url: Set(row.thumbnail_url.map(str::to_string)),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn seed_admin_user(db: &DbPool, password: &str) -> Result<(), ServiceError> {
    let hash = hash_password(password)?;
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set("admin".to_string()),
        password_hash: Set(hash),
        role: Set(user::UserRole::Admin),
        customer_id: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(())
}
