use crate::policy::ExitPolicy;
use crate::task::stdin::StdinFile;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;

pub const MACHINE_READABLE_FORMAT: &str = "JSON";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub command: CommandOptions,
    pub policy: ExitPolicy,
    pub reporters: Vec<ReporterConfig>,
    pub task: TaskSettings,
    pub stdin: Vec<StdinFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskSettings {
    /// Prepended to the names of the values a run hands back.
    pub asset_name_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReporterConfig {
    pub id: String,
    /// Registry identifier; falls back to `id`.
    pub reporter: Option<String>,
    pub destination: Option<PathBuf>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ReporterConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reporter: None,
            destination: None,
            enabled: true,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn registry_id(&self) -> &str {
        self.reporter.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandOptions {
    pub working_directory: Option<PathBuf>,
    pub env_var_path: IncludeList,
    pub bundle_gem_file: Option<PathBuf>,
    pub ruby_executable: Option<String>,
    pub bundle_executable: Option<String>,
    pub scss_lint_executable: String,
    pub format: Option<String>,
    pub require: IncludeList,
    pub linters: IncludeList,
    pub config_file: Option<PathBuf>,
    pub exclude: IncludeList,
    pub out: Option<PathBuf>,
    pub color: Option<bool>,
    pub paths: IncludeList,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            working_directory: None,
            env_var_path: IncludeList::new(),
            bundle_gem_file: None,
            ruby_executable: None,
            bundle_executable: Some("bundle".to_string()),
            scss_lint_executable: "scss-lint".to_string(),
            format: None,
            require: IncludeList::new(),
            linters: IncludeList::new(),
            config_file: None,
            exclude: IncludeList::new(),
            out: None,
            color: None,
            paths: IncludeList::new(),
        }
    }
}

impl CommandOptions {
    /// Empty strings count as unset.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref().filter(|format| !format.is_empty())
    }

    pub fn is_machine_readable(&self) -> bool {
        self.format() == Some(MACHINE_READABLE_FORMAT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Included,
    Excluded,
    Neutral,
}

impl From<Option<bool>> for Inclusion {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Inclusion::Included,
            Some(false) => Inclusion::Excluded,
            None => Inclusion::Neutral,
        }
    }
}

impl From<bool> for Inclusion {
    fn from(value: bool) -> Self {
        Inclusion::from(Some(value))
    }
}

/// Ordered item name to [`Inclusion`] map used by the set-like options.
///
/// Deserializes from a single name, a list of names (all included) or a
/// table of `name = true | false | null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeList {
    items: Vec<(String, Inclusion)>,
}

impl IncludeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I, include: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|name| (name.into(), Inclusion::from(include)))
            .collect()
    }

    /// Updates an existing item in place, appends a new one otherwise.
    pub fn set(&mut self, name: impl Into<String>, inclusion: Inclusion) {
        let name = name.into();
        match self.items.iter_mut().find(|(item, _)| *item == name) {
            Some(entry) => entry.1 = inclusion,
            None => self.items.push((name, inclusion)),
        }
    }

    pub fn include(&mut self, name: impl Into<String>) {
        self.set(name, Inclusion::Included);
    }

    pub fn exclude(&mut self, name: impl Into<String>) {
        self.set(name, Inclusion::Excluded);
    }

    pub fn remove(&mut self, name: &str) {
        self.items.retain(|(item, _)| item != name);
    }

    pub fn get(&self, name: &str) -> Option<Inclusion> {
        self.items
            .iter()
            .find(|(item, _)| item == name)
            .map(|(_, inclusion)| *inclusion)
    }

    /// Applies every item of `overlay` on top of this list.
    pub fn merge(&mut self, overlay: &IncludeList) {
        for (name, inclusion) in &overlay.items {
            self.set(name.clone(), *inclusion);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Inclusion)> + '_ {
        self.items
            .iter()
            .map(|(name, inclusion)| (name.as_str(), *inclusion))
    }

    pub fn with_inclusion(&self, wanted: Inclusion) -> impl Iterator<Item = &str> + '_ {
        self.iter()
            .filter(move |(_, inclusion)| *inclusion == wanted)
            .map(|(name, _)| name)
    }

    pub fn included(&self) -> impl Iterator<Item = &str> + '_ {
        self.with_inclusion(Inclusion::Included)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &str> + '_ {
        self.with_inclusion(Inclusion::Excluded)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Inclusion)> for IncludeList {
    fn from_iter<I: IntoIterator<Item = (S, Inclusion)>>(iter: I) -> Self {
        let mut list = IncludeList::new();
        for (name, inclusion) in iter {
            list.set(name, inclusion);
        }
        list
    }
}

impl<'de> Deserialize<'de> for IncludeList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IncludeListVisitor;

        impl<'de> Visitor<'de> for IncludeListVisitor {
            type Value = IncludeList;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a name, a list of names or a table of name = bool")
            }

            fn visit_str<E>(self, value: &str) -> Result<IncludeList, E>
            where
                E: serde::de::Error,
            {
                Ok(IncludeList::from_names([value], true))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<IncludeList, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut list = IncludeList::new();
                while let Some(name) = seq.next_element::<String>()? {
                    list.include(name);
                }
                Ok(list)
            }

            fn visit_map<A>(self, mut map: A) -> Result<IncludeList, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut list = IncludeList::new();
                while let Some((name, value)) = map.next_entry::<String, Option<bool>>()? {
                    list.set(name, Inclusion::from(value));
                }
                Ok(list)
            }
        }

        deserializer.deserialize_any(IncludeListVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::FailOn;
    use crate::task::stdin::StdinSource;

    #[test]
    fn include_list_accepts_string_list_and_table() {
        #[derive(Deserialize)]
        struct Holder {
            one: IncludeList,
            many: IncludeList,
            table: IncludeList,
        }

        let holder: Holder = toml::from_str(
            r#"
one = "foo"
many = ["foo", "bar"]
table = { a = true, c = false, d = true }
"#,
        )
        .expect("include lists should parse");

        assert_eq!(holder.one.included().collect::<Vec<_>>(), vec!["foo"]);
        assert_eq!(holder.many.included().collect::<Vec<_>>(), vec!["foo", "bar"]);
        assert_eq!(holder.table.included().collect::<Vec<_>>(), vec!["a", "d"]);
        assert_eq!(holder.table.excluded().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn include_list_treats_json_null_as_neutral() {
        let list: IncludeList =
            serde_json::from_str(r#"{"a": true, "b": null, "c": false}"#).expect("should parse");
        assert_eq!(list.get("b"), Some(Inclusion::Neutral));
        assert_eq!(list.included().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(list.excluded().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn include_list_set_keeps_position() {
        let mut list = IncludeList::from_names(["a", "b", "c"], true);
        list.exclude("b");
        assert_eq!(
            list.iter().collect::<Vec<_>>(),
            vec![
                ("a", Inclusion::Included),
                ("b", Inclusion::Excluded),
                ("c", Inclusion::Included)
            ]
        );
        list.remove("a");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn from_names_applies_default_inclusion() {
        let list = IncludeList::from_names(["x", "y"], false);
        assert_eq!(list.excluded().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(list.included().count(), 0);
    }

    #[test]
    fn task_config_parses_all_sections() {
        let cfg: TaskConfig = toml::from_str(
            r#"
[command]
working_directory = "web"
format = "JSON"
bundle_executable = ""
linters = { ColorKeyword = true, Indentation = false }
paths = ["scss/"]
color = false

[policy]
fail_on = "warning"
fail_on_no_files = true

[task]
asset_name_prefix = "scss:"

[[reporters]]
id = "checkstyle:file"
reporter = "checkstyle"
destination = "reports/checkstyle.xml"

[[reporters]]
id = "summary"

[[stdin]]
file_name = "a.scss"
content = "a { }"

[[stdin]]
file_name = "b.scss"
command = "git show :b.scss"
"#,
        )
        .expect("config should parse");

        assert_eq!(cfg.command.working_directory, Some(PathBuf::from("web")));
        assert!(cfg.command.is_machine_readable());
        assert_eq!(cfg.command.bundle_executable.as_deref(), Some(""));
        assert_eq!(cfg.command.scss_lint_executable, "scss-lint");
        assert_eq!(cfg.command.color, Some(false));
        assert_eq!(cfg.policy.fail_on, FailOn::Warning);
        assert!(cfg.policy.fail_on_no_files);
        assert_eq!(cfg.task.asset_name_prefix, "scss:");
        assert_eq!(cfg.reporters.len(), 2);
        assert_eq!(cfg.reporters[0].registry_id(), "checkstyle");
        assert_eq!(cfg.reporters[1].registry_id(), "summary");
        assert!(cfg.reporters[1].enabled);
        assert_eq!(cfg.stdin.len(), 2);
        assert_eq!(
            cfg.stdin[1].source,
            StdinSource::Command("git show :b.scss".to_string())
        );
    }

    #[test]
    fn empty_format_is_unset() {
        let options = CommandOptions {
            format: Some(String::new()),
            ..CommandOptions::default()
        };
        assert_eq!(options.format(), None);
        assert!(!options.is_machine_readable());
    }
}
