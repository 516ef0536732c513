use serde::{Deserialize, Deserializer, Serialize};

/// Largest page any facade will request.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a cursor-paginated collection.
///
/// The cursor is an opaque token issued by the server; `None` marks the end
/// of the stream. Pages are not modified after construction; callers append
/// them to build the full list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    #[serde(
        default,
        alias = "next_cursor",
        deserialize_with = "non_empty_cursor",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_cursor: Option<String>,
}

/// An empty string cursor means the same as no cursor.
fn non_empty_cursor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|c| !c.is_empty()))
}

impl<T> CursorPage<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
