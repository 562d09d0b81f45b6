pub mod grand_exchange;
pub mod util;

pub use grand_exchange::GrandExchangeProvider;
pub use util::RetryPolicy;
