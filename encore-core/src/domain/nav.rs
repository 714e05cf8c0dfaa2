//! Per-artist navigation shell

use super::artist::Artist;

const FALLBACK_IMAGE: &str = "https://github.com/shadcn.png";
const FALLBACK_NAME: &str = "Artist Name";

const SECTIONS: [(&str, &str); 4] = [
    ("Overview", "overview"),
    ("Metrics", "metrics"),
    ("Videos", "videos"),
    ("Songs", "songs"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Header and section links for an artist page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistNav {
    pub display_name: String,
    pub avatar_url: String,
    pub initial: char,
    pub items: Vec<NavItem>,
}

impl ArtistNav {
    /// Builds the nav for `pathname` (e.g. `/artists/nova/metrics`)
    ///
    /// Missing name or image fall back to placeholders.
    pub fn new(pathname: &str, name: Option<&str>, image_url: Option<&str>) -> Self {
        let base = base_path(pathname);

        let items = SECTIONS
            .iter()
            .map(|&(label, section)| NavItem {
                label,
                href: format!("{}/{}", base, section),
                active: pathname.contains(section),
            })
            .collect();

        let name = name.filter(|n| !n.is_empty());

        Self {
            display_name: name.unwrap_or(FALLBACK_NAME).to_string(),
            avatar_url: image_url
                .filter(|url| !url.is_empty())
                .unwrap_or(FALLBACK_IMAGE)
                .to_string(),
            initial: name.and_then(|n| n.chars().next()).unwrap_or('A'),
            items,
        }
    }

    pub fn for_artist(pathname: &str, artist: &Artist) -> Self {
        Self::new(pathname, Some(&artist.name), Some(&artist.image_url))
    }

    pub fn active(&self) -> Option<&NavItem> {
        self.items.iter().find(|item| item.active)
    }
}

/// First three `/`-separated segments, i.e. `/artists/<slug>`
pub fn base_path(pathname: &str) -> String {
    pathname.split('/').take(3).collect::<Vec<_>>().join("/")
}
