//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{GatewayRequest, InboundSms, SendOptions};
pub use response::GatewayResponse;
pub use validation::ValidationError;
pub use value::{ClientId, ClientSecret, RecipientInput, Recipients, SubaccountId};
