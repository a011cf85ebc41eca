//! Derives the launch command for a submitted program file from its extension.
//!

/// Extension groups mapped to the interpreter invocation used to launch a matching file, tried in
/// order. A file whose extension matches none of these is launched directly as `./{filename}`.
const LANGUAGE_TABLE: &[(&[&str], &str)] = &[(&["py", "pyc"], "python3"), (&["jar"], "java -jar")];

/// Derive the argv used to launch `filename`, based on its extension.
pub fn derive_command(filename: &str) -> Vec<String> {
    let extension = filename.rsplit('.').next().unwrap_or("");

    for (extensions, interpreter) in LANGUAGE_TABLE {
        if extensions.contains(&extension) {
            let mut argv: Vec<String> =
                interpreter.split_whitespace().map(str::to_owned).collect();
            argv.push(filename.to_owned());
            return argv;
        }
    }

    vec![format!("./{}", filename)]
}
