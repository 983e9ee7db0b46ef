use crate::error::PulseClientError;
use crate::{
    Comment, GroupPage, ImageUpload, Page, Post, PostDetail, Profile, PulseApi,
};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fs;
use std::sync::Arc;
use uuid::Uuid;

const TOKEN_FILE: &str = ".pulse_token";

#[derive(Clone)]
pub struct PulseClientHttp {
    client: Arc<Client>,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
}

impl PulseClientHttp {
    pub fn connect(endpoint: &str) -> Result<Self, PulseClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        // redirects stay visible: follow/unfollow/comment answer with 303
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url,
            token: None,
        })
    }

    pub fn set_token(&mut self, token: String) -> Result<(), PulseClientError> {
        self.token = Some(token.clone());
        fs::write(TOKEN_FILE, token)?;
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn auth_header(&self) -> Result<reqwest::header::HeaderValue, PulseClientError> {
        let token = match &self.token {
            Some(t) if !t.is_empty() => t.clone(),
            _ => fs::read_to_string(TOKEN_FILE)
                .map(|t| t.trim().to_string())
                .map_err(|_| PulseClientError::Unauthorized)?,
        };

        if token.is_empty() {
            return Err(PulseClientError::Unauthorized);
        }

        reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| PulseClientError::Unauthorized)
    }

    fn url(&self, path: &str, page: Option<u32>) -> String {
        match page {
            Some(page) => format!("{}{}?page={}", self.base_url, path, page),
            None => format!("{}{}", self.base_url, path),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        page: Option<u32>,
        authed: bool,
    ) -> Result<T, PulseClientError> {
        let mut req = self.client.get(self.url(path, page));
        if authed {
            req = req.header(reqwest::header::AUTHORIZATION, self.auth_header()?);
        }

        let resp = req.send().await?;
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(PulseClientError::from_http_response(resp).await)
        }
    }
}

#[async_trait(?Send)]
impl PulseApi for PulseClientHttp {
    async fn register(
        &mut self,
        username: String,
        email: String,
        password: String,
    ) -> Result<(), PulseClientError> {
        let resp = self
            .client
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if resp.status().is_success() {
            let auth: AuthResponse = resp.json().await?;
            self.set_token(auth.access_token)?;
            Ok(())
        } else {
            Err(PulseClientError::from_http_response(resp).await)
        }
    }

    async fn login(&mut self, username: String, password: String) -> Result<(), PulseClientError> {
        let resp = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        if resp.status().is_success() {
            let auth: AuthResponse = resp.json().await?;
            self.set_token(auth.access_token)?;
            Ok(())
        } else {
            Err(PulseClientError::from_http_response(resp).await)
        }
    }

    async fn index(&self, page: Option<u32>) -> Result<Page<Post>, PulseClientError> {
        self.get_json("/api/", page, false).await
    }

    async fn group_posts(
        &self,
        slug: &str,
        page: Option<u32>,
    ) -> Result<GroupPage, PulseClientError> {
        self.get_json(&format!("/api/group/{}", slug), page, false)
            .await
    }

    async fn profile(
        &self,
        username: &str,
        page: Option<u32>,
    ) -> Result<Profile, PulseClientError> {
        // send credentials when we have them so the follow flag is filled in
        let mut req = self.client.get(self.url(&format!("/api/profile/{}", username), page));
        if let Ok(header) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, header);
        }

        let resp = req.send().await?;
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(PulseClientError::from_http_response(resp).await)
        }
    }

    async fn post_detail(&self, id: Uuid) -> Result<PostDetail, PulseClientError> {
        self.get_json(&format!("/api/posts/{}", id), None, false)
            .await
    }

    async fn create_post(
        &self,
        text: String,
        group: Option<String>,
        image: Option<ImageUpload>,
    ) -> Result<Post, PulseClientError> {
        let image = image.map(|upload| {
            serde_json::json!({
                "file_name": upload.file_name,
                "data": base64::engine::general_purpose::STANDARD.encode(upload.bytes),
            })
        });

        let resp = self
            .client
            .post(format!("{}/api/create", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .json(&serde_json::json!({
                "text": text,
                "group": group,
                "image": image,
            }))
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(PulseClientError::from_http_response(resp).await)
        }
    }

    async fn edit_post(
        &self,
        id: Uuid,
        text: String,
        group: Option<String>,
    ) -> Result<Post, PulseClientError> {
        let resp = self
            .client
            .post(format!("{}/api/posts/{}/edit", self.base_url, id))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .json(&serde_json::json!({
                "text": text,
                "group": group,
            }))
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(PulseClientError::from_http_response(resp).await)
        }
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        text: String,
    ) -> Result<Option<Comment>, PulseClientError> {
        let resp = self
            .client
            .post(format!("{}/api/posts/{}/comment", self.base_url, post_id))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        match resp.status() {
            StatusCode::CREATED => Ok(Some(resp.json().await?)),
            StatusCode::SEE_OTHER => Ok(None),
            _ => Err(PulseClientError::from_http_response(resp).await),
        }
    }

    async fn feed(&self, page: Option<u32>) -> Result<Page<Post>, PulseClientError> {
        self.get_json("/api/follow", page, true).await
    }

    async fn follow(&self, username: &str) -> Result<(), PulseClientError> {
        let resp = self
            .client
            .get(format!("{}/api/profile/{}/follow", self.base_url, username))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .send()
            .await?;

        if resp.status().is_redirection() {
            Ok(())
        } else {
            Err(PulseClientError::from_http_response(resp).await)
        }
    }

    async fn unfollow(&self, username: &str) -> Result<(), PulseClientError> {
        let resp = self
            .client
            .get(format!(
                "{}/api/profile/{}/unfollow",
                self.base_url, username
            ))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .send()
            .await?;

        if resp.status().is_redirection() {
            Ok(())
        } else {
            Err(PulseClientError::from_http_response(resp).await)
        }
    }
}
