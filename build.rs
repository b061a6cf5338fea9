use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let docs_out = Path::new(&out_dir).join("docs");
    fs::create_dir_all(&docs_out).unwrap();

    // Copy each guide in docs/ into OUT_DIR with its links rewritten for rustdoc.
    for entry in fs::read_dir("docs").unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "md") {
            let content = fs::read_to_string(&path).unwrap();
            fs::write(
                docs_out.join(path.file_name().unwrap()),
                rewrite_guide_links(&content),
            )
            .unwrap();
        }
    }

    println!("cargo:rerun-if-changed=docs/");
}

/// `[text](./prefix-trie.md)` becomes `[text](crate::guides::prefix_trie)`.
fn rewrite_guide_links(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("](./") {
        result.push_str(&rest[..start + 2]);
        let target = &rest[start + 4..];
        match target.find(".md)") {
            Some(end) => {
                result.push_str("crate::guides::");
                result.push_str(&target[..end].replace('-', "_"));
                result.push(')');
                rest = &target[end + 4..];
            }
            None => {
                result.push_str("./");
                rest = target;
            }
        }
    }

    result.push_str(rest);
    result
}
