use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::lookup::LookupError;

// Images are only swapped into view once they are fully downloaded and decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn preload(&self, url: &str, alt: &str) -> Result<Image, LookupError>;
}

pub struct HttpImageLoader {
    client: Client,
}

impl HttpImageLoader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn decode_failure(url: &str, reason: impl ToString) -> LookupError {
    LookupError::ImageDecode {
        url: url.to_owned(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn preload(&self, url: &str, alt: &str) -> Result<Image, LookupError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| decode_failure(url, err))?;
        if !response.status().is_success() {
            return Err(decode_failure(url, response.status()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| decode_failure(url, err))?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        // hd images are routinely several megabytes, keep decoding off the runtime
        let decoded = tokio::task::spawn_blocking(move || ::image::load_from_memory(&bytes))
            .await
            .map_err(|err| decode_failure(url, err))?
            .map_err(|err| decode_failure(url, err))?;
        Ok(Image {
            url: url.to_owned(),
            alt: alt.to_owned(),
            width: decoded.width(),
            height: decoded.height(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use ::image::{ImageFormat, RgbImage};

    use super::*;

    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[tokio::test]
    async fn decodes_downloaded_images() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/hd.png")
            .with_header("content-type", "image/png")
            .with_body(png(4, 3))
            .create_async()
            .await;
        let url = format!("{}/hd.png", server.url());
        let image = HttpImageLoader::new(Client::new())
            .preload(&url, "Orion")
            .await
            .unwrap();
        assert_eq!(
            image,
            Image {
                url,
                alt: "Orion".to_owned(),
                width: 4,
                height: 3,
            }
        );
    }

    #[tokio::test]
    async fn fails_on_missing_images() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.jpg")
            .with_status(404)
            .create_async()
            .await;
        let url = format!("{}/gone.jpg", server.url());
        let result = HttpImageLoader::new(Client::new()).preload(&url, "").await;
        assert!(matches!(result, Err(LookupError::ImageDecode { .. })));
    }

    #[tokio::test]
    async fn fails_on_undecodable_images() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken.jpg")
            .with_header("content-type", "image/jpeg")
            .with_body("definitely not a jpeg")
            .create_async()
            .await;
        let url = format!("{}/broken.jpg", server.url());
        let result = HttpImageLoader::new(Client::new()).preload(&url, "").await;
        assert!(matches!(result, Err(LookupError::ImageDecode { .. })));
    }
}
