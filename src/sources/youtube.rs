use url::{form_urlencoded, Url};

/// Hosts (and their subdomains) that serve YouTube videos and playlists
const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "youtu.be", "youtube-nocookie.com"];

/// Query parameter that marks a playlist
const PLAYLIST_PARAM: &str = "list";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Video,
    Playlist,
}

/// Decide whether a URL points at a playlist or a single video.
pub fn classify(url: &str) -> UrlKind {
    if is_playlist(url) {
        UrlKind::Playlist
    } else {
        UrlKind::Video
    }
}

/// Check if a URL carries a `list` query parameter, wherever it appears
pub fn is_playlist(url: &str) -> bool {
    has_query_key(url, PLAYLIST_PARAM)
}

/// Check if a URL is a YouTube URL
pub fn is_youtube_url(url: &str) -> bool {
    match Url::parse(url.trim()) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| {
                YOUTUBE_HOSTS
                    .iter()
                    .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
            })
            .unwrap_or(false),
        Err(_) => url.contains("youtube.com") || url.contains("youtu.be"),
    }
}

fn has_query_key(url: &str, key: &str) -> bool {
    match Url::parse(url.trim()) {
        Ok(parsed) => parsed.query_pairs().any(|(k, _)| k == key),
        // Scheme-less input like "youtube.com/watch?v=..&list=.." still has a query
        Err(_) => url
            .split_once('?')
            .map(|(_, rest)| {
                let query = rest.split('#').next().unwrap_or("");
                form_urlencoded::parse(query.as_bytes()).any(|(k, _)| k == key)
            })
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_param_anywhere_in_query() {
        assert_eq!(
            classify("https://youtube.com/watch?v=abc&list=PL1"),
            UrlKind::Playlist
        );
        assert_eq!(
            classify("https://www.youtube.com/playlist?list=PLxyz"),
            UrlKind::Playlist
        );
        assert_eq!(
            classify("https://www.youtube.com/watch?list=PL1&v=abc&index=3"),
            UrlKind::Playlist
        );
        assert!(is_playlist("https://youtube.com/watch?v=abc&list="));
    }

    #[test]
    fn test_single_video_urls() {
        assert_eq!(classify("https://youtube.com/watch?v=abc"), UrlKind::Video);
        assert_eq!(classify("https://youtu.be/abc"), UrlKind::Video);
        // "list" must be the key itself, not a substring of another key or value
        assert!(!is_playlist("https://youtube.com/watch?v=list&playlist=1"));
        assert!(!is_playlist("https://youtube.com/watch?v=abc#list=PL1"));
    }

    #[test]
    fn test_malformed_urls_default_to_video() {
        assert_eq!(classify(""), UrlKind::Video);
        assert_eq!(classify("not a url"), UrlKind::Video);
        assert_eq!(classify("youtube.com/watch?v=abc&list=PL1"), UrlKind::Playlist);
    }

    #[test]
    fn test_is_youtube_url() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_youtube_url("https://music.youtube.com/playlist?list=PL1"));
        assert!(is_youtube_url("https://youtu.be/abc"));
        assert!(!is_youtube_url("https://vimeo.com/123"));
        assert!(!is_youtube_url("https://notyoutube.com/watch?v=abc"));
        assert!(is_youtube_url("youtube.com/watch?v=abc"));
    }
}
