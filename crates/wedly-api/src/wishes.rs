// Guest wishes
//
// Public endpoints behind the invitation page's guest book.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Wish, WishBody, WishEnvelope, WishList};

impl ApiClient {
    /// Every wish left so far, in the order the backend keeps them.
    ///
    /// `GET /wishes`
    pub async fn list_wishes(&self) -> Result<Vec<Wish>, Error> {
        let list: WishList = self.get(&["wishes"]).await?;
        debug!(count = list.wishes.len(), "listed wishes");
        Ok(list.wishes)
    }

    /// Leave a wish.
    ///
    /// `POST /wishes` with `{"name", "message"}`.
    pub async fn create_wish(&self, body: &WishBody) -> Result<Wish, Error> {
        debug!(name = %body.name, "leaving wish");
        let envelope: WishEnvelope = self.post(&["wishes"], body).await?;
        Ok(envelope.wish)
    }
}
