//! Ordering helpers for torrent lists.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::codec::Torrent;

/// Field a torrent list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Daemon-local numeric id.
    #[default]
    Id,
    /// Display name, compared lexically.
    Name,
    /// Unix timestamp at which the torrent was added.
    AddedDate,
}

impl SortField {
    /// Canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::AddedDate => "added-date",
        }
    }

    fn compare(self, left: &Torrent, right: &Torrent) -> Ordering {
        match self {
            Self::Id => left.id.cmp(&right.id),
            Self::Name => left.name.cmp(&right.name),
            Self::AddedDate => left.added_date.cmp(&right.added_date),
        }
    }
}

impl Display for SortField {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "added-date" | "added_date" | "addeddate" => Ok(Self::AddedDate),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Stable in-place sort; torrents with equal keys keep their relative order
/// in either direction.
pub fn sort_torrents(torrents: &mut [Torrent], field: SortField, direction: SortDirection) {
    match direction {
        SortDirection::Ascending => torrents.sort_by(|left, right| field.compare(left, right)),
        SortDirection::Descending => torrents.sort_by(|left, right| field.compare(right, left)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent(id: i64, name: &str, added_date: i64) -> Torrent {
        Torrent {
            id,
            name: name.to_string(),
            added_date,
            ..Torrent::default()
        }
    }

    fn ids(torrents: &[Torrent]) -> Vec<i64> {
        torrents.iter().map(|torrent| torrent.id).collect()
    }

    #[test]
    fn added_date_descending_reverses_ascending() {
        let mut torrents = vec![
            torrent(1, "b", 300),
            torrent(2, "a", 100),
            torrent(3, "c", 200),
            torrent(4, "d", 50),
        ];
        sort_torrents(&mut torrents, SortField::AddedDate, SortDirection::Ascending);
        let ascending = ids(&torrents);
        assert_eq!(ascending, vec![4, 2, 3, 1]);

        sort_torrents(&mut torrents, SortField::AddedDate, SortDirection::Descending);
        let mut reversed = ascending;
        reversed.reverse();
        assert_eq!(ids(&torrents), reversed);
    }

    #[test]
    fn equal_keys_keep_original_order() {
        let mut torrents = vec![
            torrent(9, "same", 10),
            torrent(3, "same", 10),
            torrent(5, "other", 10),
            torrent(1, "same", 10),
        ];
        sort_torrents(&mut torrents, SortField::AddedDate, SortDirection::Descending);
        assert_eq!(ids(&torrents), vec![9, 3, 5, 1]);

        sort_torrents(&mut torrents, SortField::Name, SortDirection::Ascending);
        assert_eq!(ids(&torrents), vec![5, 9, 3, 1]);
    }

    #[test]
    fn names_compare_lexically_and_ids_numerically() {
        let mut torrents = vec![
            torrent(10, "beta", 0),
            torrent(2, "Alpha", 0),
            torrent(33, "alpha", 0),
        ];
        sort_torrents(&mut torrents, SortField::Name, SortDirection::Ascending);
        assert_eq!(ids(&torrents), vec![2, 33, 10]);

        sort_torrents(&mut torrents, SortField::Id, SortDirection::Ascending);
        assert_eq!(ids(&torrents), vec![2, 10, 33]);
    }

    #[test]
    fn sort_field_parses_labels() {
        assert_eq!("added-date".parse::<SortField>(), Ok(SortField::AddedDate));
        assert_eq!("Name".parse::<SortField>(), Ok(SortField::Name));
        assert!("size".parse::<SortField>().is_err());
        assert_eq!(SortField::AddedDate.to_string(), "added-date");
    }
}
