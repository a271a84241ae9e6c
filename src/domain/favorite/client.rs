//! Favorites and groups sub-clients. Writes are sent once, never retried.

use crate::client::StockClient;
use crate::domain::favorite::convert::favorites_from_wire;
use crate::domain::favorite::wire::{
    CheckResponse, FavoriteResponse, FavoritesResponse, GroupResponse, GroupsResponse,
    OrderRequest, SignalsResponse,
};
use crate::domain::favorite::{
    self, Favorite, FavoriteGroup, FavoriteOrder, FavoriteUpdate, GroupUpdate, NewFavorite,
    NewGroup, SignalsOverview,
};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::StockCode;

fn validation(e: favorite::ValidationError) -> SdkError {
    SdkError::Validation(e.to_string())
}

// ─── Favorites ───────────────────────────────────────────────────────────────

pub struct Favorites<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Favorites<'a> {
    pub async fn list(&self) -> Result<Vec<Favorite>, SdkError> {
        let url = self.client.http.api_url("/favorites");
        let resp: FavoritesResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(favorites_from_wire(resp.favorites))
    }

    pub async fn add(&self, favorite: &NewFavorite) -> Result<Favorite, SdkError> {
        let url = self.client.http.api_url("/favorites");
        let resp: FavoriteResponse = self
            .client
            .http
            .post(&url, favorite, RetryPolicy::None)
            .await?;
        resp.try_into().map_err(validation)
    }

    pub async fn update(&self, id: &str, update: &FavoriteUpdate) -> Result<Favorite, SdkError> {
        let url = self
            .client
            .http
            .api_url(&format!("/favorites/{}", urlencoding::encode(id)));
        let resp: FavoriteResponse = self.client.http.put(&url, update, RetryPolicy::None).await?;
        resp.try_into().map_err(validation)
    }

    pub async fn remove(&self, id: &str) -> Result<(), SdkError> {
        let url = self
            .client
            .http
            .api_url(&format!("/favorites/{}", urlencoding::encode(id)));
        let _: serde_json::Value = self.client.http.delete(&url, RetryPolicy::None).await?;
        Ok(())
    }

    pub async fn is_favorite(&self, code: &StockCode) -> Result<bool, SdkError> {
        let url = self
            .client
            .http
            .api_url(&format!("/favorites/check/{}", code));
        let resp: CheckResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.is_favorite)
    }

    pub async fn reorder(&self, orders: &[FavoriteOrder]) -> Result<(), SdkError> {
        let url = self.client.http.api_url("/favorites/order");
        let body = OrderRequest {
            favorite_orders: orders.to_vec(),
        };
        let _: serde_json::Value = self.client.http.put(&url, &body, RetryPolicy::None).await?;
        Ok(())
    }

    /// Per-favorite indicator and prediction snapshot.
    pub async fn signals(&self) -> Result<SignalsOverview, SdkError> {
        let url = self.client.http.api_url("/favorites/signals");
        let resp: SignalsResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.into())
    }
}

// ─── Groups ──────────────────────────────────────────────────────────────────

pub struct Groups<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Groups<'a> {
    pub async fn list(&self) -> Result<Vec<FavoriteGroup>, SdkError> {
        let url = self.client.http.api_url("/groups");
        let resp: GroupsResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.groups.into_iter().map(Into::into).collect())
    }

    pub async fn create(&self, group: &NewGroup) -> Result<FavoriteGroup, SdkError> {
        let url = self.client.http.api_url("/groups");
        let resp: GroupResponse = self.client.http.post(&url, group, RetryPolicy::None).await?;
        Ok(resp.into())
    }

    pub async fn update(&self, id: &str, update: &GroupUpdate) -> Result<FavoriteGroup, SdkError> {
        let url = self
            .client
            .http
            .api_url(&format!("/groups/{}", urlencoding::encode(id)));
        let resp: GroupResponse = self.client.http.put(&url, update, RetryPolicy::None).await?;
        Ok(resp.into())
    }

    pub async fn remove(&self, id: &str) -> Result<(), SdkError> {
        let url = self
            .client
            .http
            .api_url(&format!("/groups/{}", urlencoding::encode(id)));
        let _: serde_json::Value = self.client.http.delete(&url, RetryPolicy::None).await?;
        Ok(())
    }
}
