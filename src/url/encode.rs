use percent_encoding::{percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

/// https://url.spec.whatwg.org/#fragment-percent-encode-set
const FRAGMENT_ENCODE_SET: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// https://url.spec.whatwg.org/#path-percent-encode-set
const PATH_ENCODE_SET: &AsciiSet = &FRAGMENT_ENCODE_SET.add(b'#').add(b'?').add(b'{').add(b'}');

/// https://url.spec.whatwg.org/#userinfo-percent-encode-set
const USERINFO_ENCODE_SET: &AsciiSet = &PATH_ENCODE_SET
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// Everything but the RFC 3986 unreserved characters, like PHP's `rawurlencode`
const COMPONENT_ENCODE_SET: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Encodes a value that must stay a single url component (a path segment, a query
/// key or value, a fragment)
pub fn component(input: &str) -> String {
    percent_encode(input.as_bytes(), COMPONENT_ENCODE_SET).to_string()
}

/// Encodes a path segment written by the developer, existing escapes are kept
pub fn segment(input: &str) -> String {
    percent_encode(input.as_bytes(), PATH_ENCODE_SET).to_string()
}

/// Encodes the user or password of a url
pub fn userinfo(input: &str) -> String {
    percent_encode(input.as_bytes(), USERINFO_ENCODE_SET).to_string()
}

/// Splits a path into its folders, resolving `.` and `..`
pub fn path_to_array(path: &str) -> Vec<String> {
    let mut output: Vec<String> = vec![];
    for name in path.replace('\\', "/").split('/') {
        match name {
            // Move up a folder
            ".." => {
                output.pop();
            }
            "" | "." => (),
            _ => output.push(name.to_string()),
        }
    }
    output
}

/// The path to `target` seen from the folder `current`.
///
/// Both are folder lists as returned by [`path_to_array`].
pub fn relative_path(current: &[String], target: &[String]) -> String {
    // folders in common
    let mut k = 0;
    // folders to walk back up
    let mut j = 0;

    for folder in current {
        if j > 0 || target.get(k) != Some(folder) {
            j += 1;
        } else {
            k += 1;
        }
    }

    let mut output = if j > 0 { "../".repeat(j) } else { "./".to_string() };
    output.push_str(&target[k..].join("/"));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folders(path: &str) -> Vec<String> {
        path_to_array(path)
    }

    #[test]
    fn encode_components() {
        assert_eq!(component("a b&c=d/e"), "a%20b%26c%3Dd%2Fe");
        assert_eq!(component("-_.~"), "-_.~");
        assert_eq!(component("é"), "%C3%A9");
    }

    #[test]
    fn encode_segments_keeps_existing_escapes() {
        assert_eq!(segment("a%20b"), "a%20b");
        assert_eq!(segment("a b\"<"), "a%20b%22%3C");
        assert_eq!(segment("x?y#z"), "x%3Fy%23z");
    }

    #[test]
    fn encode_userinfo() {
        assert_eq!(userinfo("us:er@x"), "us%3Aer%40x");
    }

    #[test]
    fn split_paths() {
        assert_eq!(folders("/a/b/../c/./d/"), vec!["a", "c", "d"]);
        assert_eq!(folders("\\a\\b"), vec!["a", "b"]);
        assert!(folders("/").is_empty());
        assert!(folders("/../..").is_empty());
    }

    #[test]
    fn relative_paths() {
        let inputs = vec![
            ("/", "/a/b/", "./a/b"),
            ("/a/b/", "/a/c/", "../c"),
            ("/a/b/", "/a/b/", "./"),
            ("/a/b/", "/a/b/c/", "./c"),
            ("/a/b/c/", "/x/", "../../../x"),
            ("/a/", "/", "../"),
        ];
        for (current, target, expected) in inputs {
            println!("{:?} -> {:?}", current, target);
            assert_eq!(relative_path(&folders(current), &folders(target)), expected);
        }
    }
}
