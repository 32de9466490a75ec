pub mod models;
pub mod services;

pub use models::{
    Buyer, NewOrder, OrderCreated, OrderInfo, OrderStatus, PayMethods, PayoutRequest, PayoutResponse,
    Product, RefundCreated, RefundRecord, RefundRequest, RefundStatus, ResponseStatus, ShopInfo,
};
pub use services::{AccessToken, PayuClient, ProcessorInfo, ProcessorRegistry, TokenManager};
