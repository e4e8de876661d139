use quote::{format_ident, quote};

/// Generates one `#[test]` per `.lox` file under `bin/tests/cases`, each
/// calling `lox_expect` with the file contents.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let cases_dir = format!("{}/../cases", env!("CARGO_MANIFEST_DIR"));
    let tests = walkdir::WalkDir::new(cases_dir.clone())
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .map(|entry| {
            let case_path = entry.path().to_string_lossy();
            let relative_case_path = entry.path().strip_prefix(&cases_dir).unwrap().to_string_lossy();
            let test_ident = format_ident!(
                "test_{}",
                relative_case_path.replace('/', "_").replace(".lox", "")
            );
            quote! {
                #[test]
                fn #test_ident() {
                    lox_expect(std::fs::read_to_string(#case_path).unwrap().as_str());
                }
            }
        });

    quote! {
        #[ctor::ctor]
        fn init() {
            env_logger::init();
        }

        #(#tests)*
    }
    .into()
}
