//! Reusable test content.

/// Stand-in for `lessc`, run through `sh`.
///
/// Copies the source (prefixed with the flags it saw) to the destination.
/// Sources whose name contains "broken" fail with a coloured parse error.
pub const FAKE_LESSC: &str = r#"#!/bin/sh
flags=""
src=""
dst=""
for arg in "$@"; do
  flags="$flags $src"
  src="$dst"
  dst="$arg"
done
case "$src" in
  *broken*)
    printf '\033[31mParseError: Unrecognised input\033[39m in %s\n' "$src"
    exit 1
    ;;
esac
printf '/* flags:%s */\n' "$flags" > "$dst"
cat "$src" >> "$dst"
"#;

/// Server-mode config that runs [`FAKE_LESSC`] through `sh`.
pub fn server_config(compiler: &str, extra_compiler: &str, files: &str) -> String {
    format!(
        r#"mode = "server"

[compiler]
interpreter = "sh"
compiler_path = "{compiler}"
{extra_compiler}

[files]
{files}
"#
    )
}

pub const SITE_LESS: &str = "@import \"vars.less\";\nbody { color: @text; }\n";
pub const VARS_LESS: &str = "@text: #333;\n";
