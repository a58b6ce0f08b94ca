use std::fmt;

use uuid::Uuid;

/// Clave de topic: personal (`user:<id>`) o de ruta (`route:<routeId>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopicKey {
    User(Uuid),
    Route(String),
}

impl TopicKey {
    pub fn user(user_id: Uuid) -> Self {
        TopicKey::User(user_id)
    }

    pub fn route(route_id: impl Into<String>) -> Self {
        TopicKey::Route(route_id.into())
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicKey::User(id) => write!(f, "user:{}", id),
            TopicKey::Route(id) => write!(f, "route:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_key_format() {
        let id = Uuid::nil();
        assert_eq!(
            TopicKey::user(id).to_string(),
            "user:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(TopicKey::route("R-7").to_string(), "route:R-7");
    }
}
