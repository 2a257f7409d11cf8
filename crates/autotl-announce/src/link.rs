//! Name normalisation and download link construction.

/// Separator that replaces spaces in normalised names.
pub const NAME_SEPARATOR: &str = ".";

/// Replace every space with [`NAME_SEPARATOR`].
///
/// The daemon stores names in this form, so both sides of a duplicate check
/// go through this function. Applying it twice yields the same value.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.replace(' ', NAME_SEPARATOR)
}

/// Download URL for a torrent on `site`, authenticated by `access_key`.
#[must_use]
pub fn download_link(site: &str, torrent_id: u64, access_key: &str, name: &str) -> String {
    format!(
        "https://{site}/rss/download/{torrent_id}/{access_key}/{}.torrent",
        normalize_name(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_dots() {
        assert_eq!(normalize_name("CentOS 7.0 x64"), "CentOS.7.0.x64");
        assert_eq!(normalize_name("a  b"), "a..b");
        assert_eq!(normalize_name("no-spaces"), "no-spaces");
    }

    #[test]
    fn normalisation_is_idempotent() {
        for name in ["CentOS 7.0 x64", " leading", "trailing ", "Already.Dotted"] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn link_embeds_id_key_and_dotted_name() {
        assert_eq!(
            download_link("www.torrentleech.org", 1234, "secret", "CentOS 7.0 x64"),
            "https://www.torrentleech.org/rss/download/1234/secret/CentOS.7.0.x64.torrent"
        );
    }
}
