//! Python interpreter version validation
//!
//! The pipeline's Emscripten checkout only runs on Python 2, so a
//! candidate interpreter is accepted only when it reports a version in
//! `[2.7, 3.0)`.

use std::sync::OnceLock;

use regex::Regex;
use semver::{Version, VersionReq};

use crate::config::defaults::PYTHON_VERSION_REQ;

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)python (\d+)\.(\d+)").expect("Invalid version regex"))
}

/// Extract `major.minor` from the output of `python --version`
///
/// Returns `None` when no version can be found.
pub fn parse_python_version(output: &str) -> Option<Version> {
    let caps = version_regex().captures(output)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    Some(Version::new(major, minor, 0))
}

/// Whether `version` is an acceptable Python 2 interpreter
pub fn is_supported_python(version: &Version) -> bool {
    VersionReq::parse(PYTHON_VERSION_REQ).is_ok_and(|req| req.matches(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_python_version() {
        assert_eq!(
            parse_python_version("Python 2.7.18"),
            Some(Version::new(2, 7, 0))
        );
        assert_eq!(
            parse_python_version("python 3.11.4\n"),
            Some(Version::new(3, 11, 0))
        );
        assert_eq!(
            parse_python_version("PYTHON 2.10"),
            Some(Version::new(2, 10, 0))
        );
        assert_eq!(parse_python_version("Python"), None);
        assert_eq!(parse_python_version("command not found"), None);
    }

    #[test]
    fn test_version_range() {
        assert!(is_supported_python(&Version::new(2, 7, 0)));
        assert!(is_supported_python(&Version::new(2, 9, 0)));
        assert!(!is_supported_python(&Version::new(2, 6, 0)));
        assert!(!is_supported_python(&Version::new(3, 0, 0)));
        assert!(!is_supported_python(&Version::new(3, 8, 0)));
        assert!(!is_supported_python(&Version::new(1, 9, 0)));
    }

    #[test]
    fn test_version_found_after_other_output() {
        // python 2 prints its version on stderr, after any stdout noise
        assert_eq!(
            parse_python_version("warning: something\nPython 2.7.5\n"),
            Some(Version::new(2, 7, 0))
        );
        assert_eq!(parse_python_version(""), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_only_python_two_seven_and_up_accepted(major in 0u64..6, minor in 0u64..40) {
            let output = format!("Python {major}.{minor}.1");
            let expected = major == 2 && minor >= 7;
            let accepted = parse_python_version(&output).is_some_and(|v| is_supported_python(&v));
            prop_assert_eq!(accepted, expected);
        }
    }
}
