use crate::decor::Rgb;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub media_id: String,
    pub accent: Rgb,
}

impl Track {
    pub fn embed_url(&self) -> String {
        format!(
            "https://www.youtube.com/embed/{}?enablejsapi=1&controls=0",
            self.media_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogueError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("track {index} is missing required field: {field}")]
    MissingField { index: usize, field: &'static str },
    #[error("invalid value for {field} at line {line}: {message}")]
    InvalidValue {
        line: usize,
        field: &'static str,
        message: String,
    },
    #[error("catalogue has no tracks")]
    Empty,
}

/// Ordered, non-empty list of tracks. Fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCatalogue {
    tracks: Vec<Track>,
}

impl TrackCatalogue {
    pub fn new(tracks: Vec<Track>) -> Result<Self, CatalogueError> {
        if tracks.is_empty() {
            return Err(CatalogueError::Empty);
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn load(path: &Path) -> Result<Self, CatalogueError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogueError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&text)
    }

    /// Parses blocks of `key=value` lines, each block opened by a `[track]` header.
    ///
    /// ```text
    /// [track]
    /// title = Video Games
    /// artist = Lana Del Rey
    /// album = Born to Die
    /// media_id = cE6wxDqdOV0
    /// accent = #8B4513
    /// ```
    pub fn parse(text: &str) -> Result<Self, CatalogueError> {
        let mut tracks = Vec::new();
        let mut current: Option<PartialTrack> = None;

        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line == "[track]" {
                if let Some(done) = current.take() {
                    tracks.push(done.finish(tracks.len())?);
                }
                current = Some(PartialTrack::default());
                continue;
            }

            let Some(track) = current.as_mut() else {
                return Err(CatalogueError::Parse {
                    line: line_no,
                    message: "expected [track] before fields".to_string(),
                });
            };
            let (key, value) = line.split_once('=').ok_or(CatalogueError::Parse {
                line: line_no,
                message: "expected <key>=<value>".to_string(),
            })?;
            let value = value.trim().to_string();

            match key.trim() {
                "title" => track.title = Some(value),
                "artist" => track.artist = Some(value),
                "album" => track.album = Some(value),
                "media_id" => {
                    if value.is_empty() || value.contains(char::is_whitespace) {
                        return Err(CatalogueError::InvalidValue {
                            line: line_no,
                            field: "media_id",
                            message: "must be a non-empty id without spaces".to_string(),
                        });
                    }
                    track.media_id = Some(value);
                }
                "accent" => {
                    let rgb = Rgb::parse_hex(&value).ok_or_else(|| CatalogueError::InvalidValue {
                        line: line_no,
                        field: "accent",
                        message: format!("expected #RRGGBB, got {value:?}"),
                    })?;
                    track.accent = Some(rgb);
                }
                other => {
                    return Err(CatalogueError::Parse {
                        line: line_no,
                        message: format!("unknown key: {other}"),
                    });
                }
            }
        }

        if let Some(done) = current.take() {
            tracks.push(done.finish(tracks.len())?);
        }
        Self::new(tracks)
    }
}

#[derive(Default)]
struct PartialTrack {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    media_id: Option<String>,
    accent: Option<Rgb>,
}

impl PartialTrack {
    fn finish(self, index: usize) -> Result<Track, CatalogueError> {
        let missing = |field| CatalogueError::MissingField { index, field };
        Ok(Track {
            title: self.title.ok_or_else(|| missing("title"))?,
            artist: self.artist.ok_or_else(|| missing("artist"))?,
            album: self.album.unwrap_or_default(),
            media_id: self.media_id.ok_or_else(|| missing("media_id"))?,
            accent: self.accent.unwrap_or(Rgb(0xc4, 0xa0, 0x52)),
        })
    }
}

fn track(title: &str, album: &str, media_id: &str, accent: Rgb) -> Track {
    Track {
        title: title.to_string(),
        artist: "Lana Del Rey".to_string(),
        album: album.to_string(),
        media_id: media_id.to_string(),
        accent,
    }
}

pub fn default_catalogue() -> TrackCatalogue {
    TrackCatalogue {
        tracks: vec![
            track("Video Games", "Born to Die", "cE6wxDqdOV0", Rgb(0x8b, 0x45, 0x13)),
            track("Summertime Sadness", "Born to Die", "TdrL3QxjyVw", Rgb(0xdc, 0x14, 0x3c)),
            track("Young and Beautiful", "The Great Gatsby", "o_1aF54DO60", Rgb(0xff, 0xd7, 0x00)),
            track("Born to Die", "Born to Die", "Bag1gUxuU0g", Rgb(0x80, 0x00, 0x20)),
            track("Blue Jeans", "Born to Die", "JRWox-i6aAk", Rgb(0x00, 0x00, 0x80)),
        ],
    }
}
