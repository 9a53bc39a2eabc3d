use std::path::PathBuf;

use tracing::debug;

use crate::http::site::Site;

/// HTTP status codes the server answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webserv::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// The file chosen to answer a request, and the status to send it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    /// Name relative to the site root; drives the mime lookup.
    pub name: String,
    /// Where the body is read from.
    pub path: PathBuf,
}

impl Response {
    /// Maps a parsed request target to a file under the site root.
    ///
    /// - no target, or a target ending in `/` other than `/` itself: error page, 404
    /// - `/`: the index page
    /// - anything else: the file with the leading `/` removed, or the error
    ///   page with 404 if it cannot be opened
    pub async fn for_resource(site: &Site, resource: Option<&str>) -> Self {
        let Some(resource) = resource else {
            debug!("unable to parse request, sending error page");
            return Self::not_found(site);
        };

        if resource.len() > 1 && resource.ends_with('/') {
            debug!(resource, "directory requested, sending error page");
            return Self::not_found(site);
        }

        let name = if resource == "/" {
            site.index_page.as_str()
        } else {
            resource.strip_prefix('/').unwrap_or(resource)
        };

        match site.locate(name).await {
            Some(path) => Self {
                status: StatusCode::Ok,
                name: name.to_string(),
                path,
            },
            None => {
                debug!(resource, "unable to open resource, sending error page");
                Self::not_found(site)
            }
        }
    }

    /// The site's error page with a 404 status.
    pub fn not_found(site: &Site) -> Self {
        Self {
            status: StatusCode::NotFound,
            name: site.error_page.clone(),
            path: site.error_path(),
        }
    }
}
