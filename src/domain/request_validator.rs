use actix_web::http::Method;

/// The subscriber URL pattern a request was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceTarget {
    /// `/subscribers`
    Collection,
    /// `/subscribers/{id}`
    Item,
}

impl ResourceTarget {
    /// Value of the `Allow` header for this pattern.
    pub fn allowed_methods(&self) -> &'static str {
        match self {
            ResourceTarget::Collection => "GET, POST",
            ResourceTarget::Item => "GET, PUT, PATCH, DELETE",
        }
    }
}

/// Persistence operation an accepted request maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Rejection {
    #[error(
        "HTTP command POST without query parameters is not allowed. Please provide an acceptable HTTP command."
    )]
    CreateWithoutQuery,
    #[error(
        "HTTP command PUT/PATCH without query parameters is not allowed. Please provide an acceptable HTTP command."
    )]
    UpdateWithoutQuery,
    #[error(
        "The {method} method is not supported for this route. Supported methods: {}.",
        .target.allowed_methods()
    )]
    UnsupportedMethod {
        method: Method,
        target: ResourceTarget,
    },
}

impl Rejection {
    pub fn allowed_methods(&self) -> &'static str {
        match self {
            Rejection::CreateWithoutQuery => ResourceTarget::Collection.allowed_methods(),
            Rejection::UpdateWithoutQuery => ResourceTarget::Item.allowed_methods(),
            Rejection::UnsupportedMethod { target, .. } => target.allowed_methods(),
        }
    }
}

/// Decide whether a request may reach storage, looking only at its method,
/// the pattern it matched and whether it carries a query string.
///
/// Creation and updates are only accepted when a query string is present,
/// whatever the body holds.
pub fn validate(
    method: &Method,
    has_query_string: bool,
    target: ResourceTarget,
) -> Result<Operation, Rejection> {
    use ResourceTarget::{Collection, Item};

    match (target, method.as_str()) {
        (Collection, "GET") => Ok(Operation::List),
        (Collection, "POST") if has_query_string => Ok(Operation::Create),
        (Collection, "POST") => Err(Rejection::CreateWithoutQuery),
        (Item, "GET") => Ok(Operation::Retrieve),
        (Item, "PUT" | "PATCH") if has_query_string => Ok(Operation::Update),
        (Item, "PUT" | "PATCH") => Err(Rejection::UpdateWithoutQuery),
        (Item, "DELETE") => Ok(Operation::Delete),
        _ => Err(Rejection::UnsupportedMethod {
            method: method.clone(),
            target,
        }),
    }
}

/// A raw query string counts as present once it holds at least one
/// non-empty `&`-separated segment.
pub fn has_query_string(raw: &str) -> bool {
    raw.split('&').any(|segment| !segment.is_empty())
}
