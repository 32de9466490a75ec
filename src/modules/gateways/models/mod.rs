pub mod common;
pub mod order;
pub mod payout;
pub mod refund;
pub mod shop;

pub use common::{OrderStatus, RefundStatus, ResponseStatus};
pub use order::{
    Buyer, CancellationResponse, CaptureResponse, NewOrder, OrderCreated, OrderDetails, OrderInfo,
    Product, ProductRecord, TransactionsResponse,
};
pub use payout::{PayoutRecord, PayoutRequest, PayoutResponse};
pub use refund::{RefundCreated, RefundList, RefundRecord, RefundRequest, RefundType};
pub use shop::{Balance, CardToken, PayByLink, PayMethods, ShopInfo};
