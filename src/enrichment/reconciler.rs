//! Per-record field reconciliation.
//!
//! Decides whether a catalogue entry needs a repository lookup, and applies a
//! lookup result to the entry. Both halves are pure: no I/O happens here.

use crate::catalogue::{CatalogueEntry, Field};

use super::domain::{RepoRef, RepositoryInfo};
use super::naming::format_display_name;

/// What to do with descriptions that are already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionMode {
    /// Leave existing descriptions alone (skip-if-already-described)
    #[default]
    KeepExisting,
    /// Overwrite descriptions from the repository (force refresh)
    Refresh,
}

/// Which fields a run looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldScope {
    /// Name, author, description and icon
    #[default]
    Full,
    /// Description only; other fields and icons are ignored
    DescriptionOnly,
}

/// Mode flags for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileMode {
    pub description: DescriptionMode,
    pub scope: FieldScope,
    /// Also look up a download URL when `downloadURL` is absent (full scope only)
    pub resolve_downloads: bool,
}

impl ReconcileMode {
    pub fn refresh_descriptions(mut self) -> Self {
        self.description = DescriptionMode::Refresh;
        self
    }

    pub fn descriptions_only(mut self) -> Self {
        self.scope = FieldScope::DescriptionOnly;
        self
    }

    pub fn with_downloads(mut self) -> Self {
        self.resolve_downloads = true;
        self
    }

    /// Whether icon presence matters for this mode.
    pub fn checks_icons(&self) -> bool {
        self.scope == FieldScope::Full
    }
}

/// Why a record was not fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No recognized repository host reference
    InvalidRepo,
    /// Nothing missing under the current mode
    Complete,
}

/// What needs filling on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MissingFields {
    pub name: bool,
    pub author: bool,
    pub description: bool,
    pub icon: bool,
    pub download_url: bool,
}

impl MissingFields {
    pub fn any(&self) -> bool {
        self.name || self.author || self.description || self.icon || self.download_url
    }

    /// Short labels for reporting.
    pub fn labels(&self) -> Vec<&'static str> {
        [
            (self.name, "name"),
            (self.author, "author"),
            (self.description, "description"),
            (self.icon, "icon"),
            (self.download_url, "downloadURL"),
        ]
        .into_iter()
        .filter_map(|(missing, label)| missing.then_some(label))
        .collect()
    }
}

/// Outcome of reconciling one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    NeedsFetch { repo: RepoRef, missing: MissingFields },
}

/// Decide whether `entry` needs a repository lookup.
///
/// `icon_present` is only consulted in full scope.
pub fn reconcile(entry: &CatalogueEntry, icon_present: bool, mode: &ReconcileMode) -> Decision {
    let Some(repo) = entry.repository().and_then(RepoRef::parse) else {
        return Decision::Skip(SkipReason::InvalidRepo);
    };

    let description =
        mode.description == DescriptionMode::Refresh || !entry.has(Field::Description);

    let missing = match mode.scope {
        FieldScope::Full => MissingFields {
            name: !entry.has(Field::Name),
            author: !entry.has(Field::Author),
            description,
            icon: !icon_present,
            download_url: mode.resolve_downloads && !entry.has(Field::DownloadUrl),
        },
        FieldScope::DescriptionOnly => MissingFields {
            description,
            ..MissingFields::default()
        },
    };

    if !missing.any() {
        return Decision::Skip(SkipReason::Complete);
    }
    Decision::NeedsFetch { repo, missing }
}

/// Fill `entry` from a repository lookup. Returns the fields that changed.
///
/// Only fields flagged in `missing` are touched, and only the description
/// may overwrite an existing string value (in refresh mode).
pub fn apply_repository_info(
    entry: &mut CatalogueEntry,
    info: &RepositoryInfo,
    missing: &MissingFields,
    mode: &ReconcileMode,
) -> Vec<Field> {
    let mut changed = Vec::new();

    if missing.name && entry.fill(Field::Name, format_display_name(&info.name)) {
        changed.push(Field::Name);
    }

    if missing.author && entry.fill(Field::Author, info.owner.clone()) {
        changed.push(Field::Author);
    }

    if missing.description {
        let description = info.description.clone().unwrap_or_default();
        match mode.description {
            DescriptionMode::Refresh => {
                if entry.replace(Field::Description, description) {
                    changed.push(Field::Description);
                }
            }
            DescriptionMode::KeepExisting => {
                if entry.fill(Field::Description, description) {
                    changed.push(Field::Description);
                }
            }
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::repo_info as info;

    fn complete_entry() -> CatalogueEntry {
        CatalogueEntry::with_repository("https://github.com/x/y")
            .with(Field::Name, "Y")
            .with(Field::Author, "x")
            .with(Field::Description, "d")
    }

    #[test]
    fn test_invalid_repo_always_skipped() {
        let mode = ReconcileMode::default().refresh_descriptions();
        for entry in [
            CatalogueEntry::new(),
            CatalogueEntry::with_repository("https://gitlab.com/x/z"),
            CatalogueEntry::with_repository("not a url"),
        ] {
            assert_eq!(
                reconcile(&entry, false, &mode),
                Decision::Skip(SkipReason::InvalidRepo)
            );
        }
    }

    #[test]
    fn test_complete_entry_with_icon_is_skipped() {
        let decision = reconcile(&complete_entry(), true, &ReconcileMode::default());
        assert_eq!(decision, Decision::Skip(SkipReason::Complete));
    }

    #[test]
    fn test_missing_icon_needs_fetch() {
        let decision = reconcile(&complete_entry(), false, &ReconcileMode::default());
        let Decision::NeedsFetch { repo, missing } = decision else {
            panic!("expected fetch");
        };
        assert_eq!(repo, RepoRef::new("x", "y"));
        assert_eq!(missing.labels(), vec!["icon"]);
    }

    #[test]
    fn test_each_missing_field_triggers_fetch() {
        for field in [Field::Name, Field::Author, Field::Description] {
            let mut entry = CatalogueEntry::with_repository("https://github.com/x/y");
            for f in [Field::Name, Field::Author, Field::Description] {
                if f != field {
                    entry.set(f, "v");
                }
            }
            assert!(
                matches!(
                    reconcile(&entry, true, &ReconcileMode::default()),
                    Decision::NeedsFetch { .. }
                ),
                "missing {field} should trigger a fetch"
            );
        }
    }

    #[test]
    fn test_refresh_forces_fetch() {
        let mode = ReconcileMode::default().refresh_descriptions();
        let Decision::NeedsFetch { missing, .. } = reconcile(&complete_entry(), true, &mode) else {
            panic!("expected fetch");
        };
        assert!(missing.description);
        assert!(!missing.name);
    }

    #[test]
    fn test_description_only_ignores_other_fields() {
        let mode = ReconcileMode::default().descriptions_only();
        let entry = CatalogueEntry::with_repository("https://github.com/x/y")
            .with(Field::Description, "d");
        assert_eq!(
            reconcile(&entry, false, &mode),
            Decision::Skip(SkipReason::Complete)
        );

        let entry = CatalogueEntry::with_repository("https://github.com/x/y");
        let Decision::NeedsFetch { missing, .. } = reconcile(&entry, false, &mode) else {
            panic!("expected fetch");
        };
        assert_eq!(missing.labels(), vec!["description"]);
    }

    #[test]
    fn test_download_url_only_checked_when_enabled() {
        let entry = complete_entry();
        assert_eq!(
            reconcile(&entry, true, &ReconcileMode::default()),
            Decision::Skip(SkipReason::Complete)
        );

        let mode = ReconcileMode::default().with_downloads();
        let Decision::NeedsFetch { missing, .. } = reconcile(&entry, true, &mode) else {
            panic!("expected fetch");
        };
        assert_eq!(missing.labels(), vec!["downloadURL"]);
    }

    #[test]
    fn test_apply_fills_missing_fields() {
        let mut entry = CatalogueEntry::with_repository("https://github.com/x/y");
        let mode = ReconcileMode::default();
        let Decision::NeedsFetch { missing, .. } = reconcile(&entry, true, &mode) else {
            panic!("expected fetch");
        };

        let changed = apply_repository_info(&mut entry, &info("y", "x", Some("d")), &missing, &mode);

        assert_eq!(changed, vec![Field::Name, Field::Author, Field::Description]);
        assert_eq!(entry.get(Field::Name), Some("Y"));
        assert_eq!(entry.get(Field::Author), Some("x"));
        assert_eq!(entry.get(Field::Description), Some("d"));
    }

    #[test]
    fn test_apply_null_description_becomes_empty() {
        let mut entry = CatalogueEntry::with_repository("https://github.com/x/y");
        let missing = MissingFields {
            description: true,
            ..Default::default()
        };
        apply_repository_info(&mut entry, &info("y", "x", None), &missing, &ReconcileMode::default());
        assert_eq!(entry.get(Field::Description), Some(""));
    }

    #[test]
    fn test_apply_never_overwrites_name_or_author() {
        let mut entry = complete_entry();
        let missing = MissingFields {
            name: true,
            author: true,
            description: true,
            ..Default::default()
        };
        let changed = apply_repository_info(
            &mut entry,
            &info("other", "someone-else", Some("new")),
            &missing,
            &ReconcileMode::default(),
        );
        assert!(changed.is_empty());
        assert_eq!(entry, complete_entry());
    }

    #[test]
    fn test_apply_refresh_overwrites_description() {
        let mut entry = complete_entry();
        let mode = ReconcileMode::default().refresh_descriptions();
        let missing = MissingFields {
            description: true,
            ..Default::default()
        };

        let changed = apply_repository_info(&mut entry, &info("y", "x", Some("new")), &missing, &mode);
        assert_eq!(changed, vec![Field::Description]);
        assert_eq!(entry.get(Field::Description), Some("new"));

        // Same text again is not a change
        let changed = apply_repository_info(&mut entry, &info("y", "x", Some("new")), &missing, &mode);
        assert!(changed.is_empty());
    }
}
