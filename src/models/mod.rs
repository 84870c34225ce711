mod subscriber;

pub use subscriber::{Subscriber, SubscriberGateway};
