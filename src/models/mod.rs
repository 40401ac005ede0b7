pub mod calendar;
pub mod futures;
pub mod notice;
pub mod quote;
pub mod response;
pub mod stock;

pub use calendar::*;
pub use futures::*;
pub use notice::*;
pub use quote::*;
pub use response::*;
pub use stock::*;
