mod request_validator;
mod subscriber_fields;

pub use request_validator::{
    Operation, Rejection, ResourceTarget, has_query_string, validate,
};
pub use subscriber_fields::{FieldsError, SubscriberFields};
