use {
    async_trait::async_trait,
    reqwest::{
        Client, Response,
        header::LINK,
        multipart::{Form, Part},
    },
    secrecy::{ExposeSecret, Secret},
    serde::de::DeserializeOwned,
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    types::{
        AttachmentAction, CreateMessage, FileUpload, ItemList, Message, Person, RoomSummary,
        Webhook,
    },
    webhooks::WebhookSubscription,
};

pub const DEFAULT_API_BASE: &str = "https://webexapis.com/v1";

const PAGE_SIZE: &str = "100";

/// Webex REST operations the engine depends on.
#[async_trait]
pub trait WebexApi: Send + Sync {
    /// All rooms of `room_type` ("group" or "direct") the bot belongs to.
    async fn list_rooms(&self, room_type: &str) -> Result<Vec<RoomSummary>>;

    async fn create_message(&self, message: &CreateMessage<'_>) -> Result<Message>;

    /// Send a file message as multipart form data. Returns the HTTP status;
    /// only transport failures are errors.
    async fn upload_file(&self, upload: &FileUpload<'_>) -> Result<u16>;

    async fn list_webhooks(&self) -> Result<Vec<Webhook>>;

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()>;

    async fn create_webhook(&self, webhook: &WebhookSubscription) -> Result<Webhook>;

    /// The identity behind the access token.
    async fn me(&self) -> Result<Person>;

    async fn get_message(&self, message_id: &str) -> Result<Message>;

    async fn get_attachment_action(&self, action_id: &str) -> Result<AttachmentAction>;
}

/// reqwest-backed [`WebexApi`] authenticating with a bot access token.
pub struct HttpWebexApi {
    http: Client,
    base_url: String,
    token: Secret<String>,
}

impl HttpWebexApi {
    pub fn new(token: Secret<String>) -> Self {
        Self::with_base_url(Client::new(), DEFAULT_API_BASE, token)
    }

    pub fn with_base_url(http: Client, base_url: &str, token: Secret<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &'static str, url: &str) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;
        Ok(check(operation, resp).await?.json().await?)
    }

    /// Follow `Link: <…>; rel="next"` headers until the listing is complete.
    async fn get_all<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        first_url: String,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first_url);
        while let Some(url) = next.take() {
            let resp = self
                .http
                .get(&url)
                .bearer_auth(self.token.expose_secret())
                .send()
                .await?;
            let resp = check(operation, resp).await?;
            next = resp
                .headers()
                .get_all(LINK)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .find_map(next_link);
            let page: ItemList<T> = resp.json().await?;
            debug!(operation, count = page.items.len(), "fetched page");
            items.extend(page.items);
        }
        Ok(items)
    }
}

async fn check(operation: &'static str, resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Api {
        operation,
        status,
        body,
    })
}

/// Extract the `rel="next"` target from a `Link` header value.
fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim().replace(' ', "") == "rel=\"next\"");
        if !is_next {
            return None;
        }
        let target = target.trim();
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

#[async_trait]
impl WebexApi for HttpWebexApi {
    async fn list_rooms(&self, room_type: &str) -> Result<Vec<RoomSummary>> {
        let url = format!(
            "{}?type={}&max={PAGE_SIZE}",
            self.url("rooms"),
            urlencoding::encode(room_type)
        );
        self.get_all("list rooms", url).await
    }

    async fn create_message(&self, message: &CreateMessage<'_>) -> Result<Message> {
        let resp = self
            .http
            .post(self.url("messages"))
            .bearer_auth(self.token.expose_secret())
            .json(message)
            .send()
            .await?;
        Ok(check("create message", resp).await?.json().await?)
    }

    async fn upload_file(&self, upload: &FileUpload<'_>) -> Result<u16> {
        let (field, value) = upload.destination.field();
        let file = Part::text(upload.content.to_string())
            .file_name(upload.filename.to_string())
            .mime_str(upload.mime)?;
        let form = Form::new()
            .text(field, value.to_string())
            .text("markdown", upload.markdown.to_string())
            .part("files", file);
        let resp = self
            .http
            .post(self.url("messages"))
            .bearer_auth(self.token.expose_secret())
            .multipart(form)
            .send()
            .await?;
        Ok(resp.status().as_u16())
    }

    async fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        let url = format!("{}?max={PAGE_SIZE}", self.url("webhooks"));
        self.get_all("list webhooks", url).await
    }

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        let url = self.url(&format!("webhooks/{}", urlencoding::encode(webhook_id)));
        let resp = self
            .http
            .delete(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;
        check("delete webhook", resp).await?;
        Ok(())
    }

    async fn create_webhook(&self, webhook: &WebhookSubscription) -> Result<Webhook> {
        let resp = self
            .http
            .post(self.url("webhooks"))
            .bearer_auth(self.token.expose_secret())
            .json(webhook)
            .send()
            .await?;
        Ok(check("create webhook", resp).await?.json().await?)
    }

    async fn me(&self) -> Result<Person> {
        self.get_json("get identity", &self.url("people/me")).await
    }

    async fn get_message(&self, message_id: &str) -> Result<Message> {
        let url = self.url(&format!("messages/{}", urlencoding::encode(message_id)));
        self.get_json("get message", &url).await
    }

    async fn get_attachment_action(&self, action_id: &str) -> Result<AttachmentAction> {
        let url = self.url(&format!(
            "attachment/actions/{}",
            urlencoding::encode(action_id)
        ));
        self.get_json("get attachment action", &url).await
    }
}
