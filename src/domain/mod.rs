pub mod payment;

pub use payment::{CallbackResult, PaymentOutcome, TransactionRequest};
