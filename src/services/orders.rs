use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::hash_password;
use crate::db::DbPool;
use crate::entities::order::OrderStatus;
use crate::entities::{customer, notification, order, order_item, product, user};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

use super::conflict_on_unique;

const WELCOME_TITLE: &str = "Welcome to Omrani's Pastery!";
const WELCOME_MESSAGE: &str =
    "Your account has been created. Use your email to log in. Default password: pastery123";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub notes: Option<String>,
    /// Client-side total, accepted for cross-checking only. The stored total
    /// is always recomputed from catalog prices.
    pub total: Option<Decimal>,
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Client-side price, accepted for cross-checking only.
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub order: order::Model,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<OrderItemDetail>,
}

/// Order line joined with the catalog fields the dashboard renders.
#[derive(Debug, Serialize)]
pub struct OrderItemDetail {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub emoji: Option<String>,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Order placement and management. Placement runs as a single transaction so
/// a failure at any step leaves no partial rows behind.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    default_customer_password: String,
}

impl OrderService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        default_customer_password: String,
    ) -> Self {
        Self {
            db,
            event_sender,
            default_customer_password,
        }
    }

    /// Places an order: resolves or provisions the customer, snapshots prices
    /// from the catalog, and writes the order with its lines atomically.
    #[instrument(skip(self, request), fields(customer_email = %request.customer_email))]
    pub async fn place_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<PlaceOrderResponse, ServiceError> {
        request.validate()?;
        for item in &request.items {
            item.validate()?;
        }

        let email = request.customer_email.trim().to_lowercase();
        let txn = self.db.begin().await?;

        let (customer_id, newly_registered) = self.resolve_customer(&txn, &request, &email).await?;

        // Snapshot catalog prices and recompute the total before any order
        // row exists. An unknown product aborts the whole transaction.
        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let mut computed_total = Decimal::ZERO;
        let mut lines = Vec::with_capacity(request.items.len());

        for item in &request.items {
            let Some(listed) = product::Entity::find_by_id(item.product_id).one(&txn).await? else {
                return Err(ServiceError::NotFound(format!(
                    "Product {} not found",
                    item.product_id
                )));
            };
            if let Some(claimed) = item.unit_price {
                if claimed != listed.price {
                    warn!(product_id = %listed.id, %claimed, catalog = %listed.price,
                        "client unit price disagrees with catalog, using catalog price");
                }
            }
            let quantity = Decimal::from(item.quantity);
            computed_total += listed.price * quantity;
            lines.push(order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(listed.id),
                quantity: Set(item.quantity),
                price_at_purchase: Set(listed.price),
                created_at: Set(now),
            });
        }

        if let Some(claimed) = request.total {
            if claimed != computed_total {
                warn!(%claimed, %computed_total, "client total disagrees with catalog, storing recomputed total");
            }
        }

        let order_number = generate_order_number(order_id);
        let placed = order::ActiveModel {
            id: Set(order_id),
            order_number: Set(order_number.clone()),
            customer_id: Set(customer_id),
            customer_name: Set(request.customer_name.clone()),
            customer_email: Set(email.clone()),
            customer_phone: Set(request.customer_phone.clone()),
            customer_address: Set(request.customer_address.clone()),
            status: Set(OrderStatus::Pending),
            total_amount: Set(computed_total),
            notes: Set(request.notes.clone()),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await?;

        for line in lines {
            line.insert(&txn).await?;
        }

        txn.commit().await?;

        info!(%order_id, %order_number, "order placed");
        if let Some(sender) = &self.event_sender {
            if newly_registered {
                sender
                    .send(Event::CustomerRegistered {
                        customer_id,
                        email: email.clone(),
                    })
                    .await;
            }
            sender
                .send(Event::OrderPlaced {
                    order_id,
                    order_number,
                    customer_id,
                })
                .await;
        }

        Ok(PlaceOrderResponse {
            order: placed,
            message: "Order placed and account created/updated successfully.".to_string(),
        })
    }

    /// Finds the customer by email, refreshing their contact details, or
    /// provisions a new customer with a login credential and a welcome
    /// notification. Returns the customer id and whether they are new.
    async fn resolve_customer(
        &self,
        txn: &DatabaseTransaction,
        request: &PlaceOrderRequest,
        email: &str,
    ) -> Result<(Uuid, bool), ServiceError> {
        let now = Utc::now();

        if let Some(existing) = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(txn)
            .await?
        {
            let customer_id = existing.id;
            let mut refresh: customer::ActiveModel = existing.into();
            refresh.name = Set(request.customer_name.clone());
            refresh.phone = Set(request.customer_phone.clone());
            refresh.address = Set(request.customer_address.clone());
            refresh.updated_at = Set(now);
            refresh.update(txn).await?;
            return Ok((customer_id, false));
        }

        let customer_id = Uuid::new_v4();
        customer::ActiveModel {
            id: Set(customer_id),
            name: Set(request.customer_name.clone()),
            email: Set(email.to_string()),
            phone: Set(request.customer_phone.clone()),
            address: Set(request.customer_address.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        // Two first orders racing on the same email: one insert loses on the
        // unique index and the whole transaction rolls back with a 409.
        .map_err(|e| conflict_on_unique(e, "An account with this email already exists"))?;

        let password_hash = hash_password(&self.default_customer_password)?;
        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(email.to_string()),
            password_hash: Set(password_hash),
            role: Set(user::UserRole::Customer),
            customer_id: Set(Some(customer_id)),
            created_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| conflict_on_unique(e, "An account with this email already exists"))?;

        notification::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer_id),
            title: Set(WELCOME_TITLE.to_string()),
            message: Set(WELCOME_MESSAGE.to_string()),
            is_read: Set(false),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;

        Ok((customer_id, true))
    }

    /// All orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<order::Model>, ServiceError> {
        let orders = order::Entity::find()
            .order_by_desc(order::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(orders)
    }

    /// A single order with its lines joined against the catalog.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderDetailResponse, ServiceError> {
        let Some(found) = order::Entity::find_by_id(order_id)
            .one(self.db.as_ref())
            .await?
        else {
            return Err(ServiceError::NotFound("Order not found".to_string()));
        };

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .find_also_related(product::Entity)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|(line, listed)| {
                let (name, emoji) = listed
                    .map(|p| (p.name, p.emoji))
                    .unwrap_or_else(|| ("Unknown product".to_string(), None));
                OrderItemDetail {
                    id: line.id,
                    product_id: line.product_id,
                    name,
                    emoji,
                    quantity: line.quantity,
                    price_at_purchase: line.price_at_purchase,
                }
            })
            .collect();

        Ok(OrderDetailResponse {
            order: found,
            items,
        })
    }

    /// Moves an order to a new status. Unknown statuses are rejected before
    /// anything is written.
    #[instrument(skip(self, request), fields(status = %request.status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<order::Model, ServiceError> {
        let Some(status) = OrderStatus::parse(&request.status) else {
            return Err(ServiceError::ValidationError(format!(
                "Invalid order status: {}",
                request.status
            )));
        };

        let Some(found) = order::Entity::find_by_id(order_id)
            .one(self.db.as_ref())
            .await?
        else {
            return Err(ServiceError::NotFound("Order not found".to_string()));
        };

        let mut updating: order::ActiveModel = found.into();
        updating.status = Set(status);
        updating.updated_at = Set(Some(Utc::now()));
        let updated = updating.update(self.db.as_ref()).await?;

        if let Some(sender) = &self.event_sender {
            sender
                .send(Event::OrderStatusChanged { order_id, status })
                .await;
        }

        Ok(updated)
    }
}

/// Order numbers derive from the order id, so two orders placed in the same
/// instant can never collide.
fn generate_order_number(order_id: Uuid) -> String {
    let hex = order_id.simple().to_string();
    format!("ORD-{}", hex[..8].to_uppercase())
}
