//! Manifest parsing functionality
//!
//! This module parses `go.mod` manifests into [`Manifest`] values. Two modes
//! are supported: strict parsing fails on unknown or malformed directives,
//! lenient parsing skips them. An optional version fixer normalizes version
//! strings before they are validated and recorded.

use std::path::Path;

use crate::error::{Result, WalkError};
use crate::models::config::VersionFixer;
use crate::models::manifest::{Manifest, ModuleVersion, Replace, Require, Retract};

/// Parser for module manifests
pub struct ModfileParser;

/// State of a parenthesized directive block
enum Block {
    /// Inside a block for a known verb; lines carry that verb's arguments
    Verb(String),
    /// Inside a block being skipped in lenient mode
    Skip,
}

impl ModfileParser {
    /// Parse manifest content strictly.
    ///
    /// Unknown directives, malformed arguments and invalid versions fail
    /// the parse.
    pub fn parse(path: &Path, content: &str, fixer: Option<&VersionFixer>) -> Result<Manifest> {
        Self::parse_inner(path, content, true, fixer)
    }

    /// Parse manifest content leniently.
    ///
    /// Unknown directives and lines whose arguments do not parse are
    /// skipped. Structural errors (an unclosed block) still fail.
    pub fn parse_lax(path: &Path, content: &str, fixer: Option<&VersionFixer>) -> Result<Manifest> {
        Self::parse_inner(path, content, false, fixer)
    }

    fn parse_inner(
        path: &Path,
        content: &str,
        strict: bool,
        fixer: Option<&VersionFixer>,
    ) -> Result<Manifest> {
        let mut manifest = Manifest {
            path: path.to_path_buf(),
            ..Default::default()
        };

        let mut block: Option<Block> = None;

        for (idx, raw_line) in content.lines().enumerate() {
            let lineno = idx + 1;

            let (tokens, comment) = match tokenize(raw_line) {
                Ok(parts) => parts,
                Err(message) => {
                    if strict {
                        return Err(parse_error(path, lineno, message));
                    }
                    continue;
                }
            };
            if tokens.is_empty() {
                continue;
            }

            // closing or continuing an open block
            if let Some(open) = &block {
                if tokens[0] == ")" {
                    if tokens.len() != 1 && strict {
                        return Err(parse_error(path, lineno, "unexpected token after )".into()));
                    }
                    block = None;
                    continue;
                }
                let outcome = match open {
                    Block::Skip => Ok(()),
                    Block::Verb(verb) => {
                        apply_directive(&mut manifest, verb, &tokens, comment.as_deref(), fixer)
                    }
                };
                if let Err(message) = outcome {
                    if strict {
                        return Err(parse_error(path, lineno, message));
                    }
                }
                continue;
            }

            let verb = tokens[0].as_str();

            // opening a block
            if tokens.len() == 2 && tokens[1] == "(" {
                if is_block_verb(verb) {
                    block = Some(Block::Verb(verb.to_string()));
                } else if strict {
                    return Err(parse_error(
                        path,
                        lineno,
                        format!("directive {verb:?} does not take a block"),
                    ));
                } else {
                    block = Some(Block::Skip);
                }
                continue;
            }

            if let Err(message) =
                apply_directive(&mut manifest, verb, &tokens[1..], comment.as_deref(), fixer)
            {
                if strict {
                    return Err(parse_error(path, lineno, message));
                }
            }
        }

        // an unclosed block is a structural error in both modes
        if block.is_some() {
            return Err(parse_error(
                path,
                content.lines().count(),
                "unclosed block at end of file".into(),
            ));
        }

        Ok(manifest)
    }
}

/// Apply one directive's arguments to the manifest under construction.
/// Errors are plain messages; the caller attaches file and line context and
/// decides whether they are fatal.
fn apply_directive(
    manifest: &mut Manifest,
    verb: &str,
    args: &[String],
    comment: Option<&str>,
    fixer: Option<&VersionFixer>,
) -> std::result::Result<(), String> {
    match verb {
        "module" => {
            if args.len() != 1 {
                return Err("usage: module module/path".into());
            }
            if manifest.module.is_some() {
                return Err("repeated module statement".into());
            }
            manifest.module = Some(args[0].clone());
            Ok(())
        }
        "go" => {
            if args.len() != 1 || !is_go_version(&args[0]) {
                return Err("usage: go 1.23".into());
            }
            manifest.go_version = Some(args[0].clone());
            Ok(())
        }
        "toolchain" => {
            if args.len() != 1 {
                return Err("usage: toolchain name".into());
            }
            manifest.toolchain = Some(args[0].clone());
            Ok(())
        }
        "godebug" => {
            // accepted for compatibility, not modeled
            if args.is_empty() {
                return Err("usage: godebug key=value".into());
            }
            Ok(())
        }
        "require" => {
            if args.len() != 2 {
                return Err("usage: require module/path v1.2.3".into());
            }
            let version = fix_version(&args[0], &args[1], fixer)?;
            manifest.requires.push(Require {
                module: ModuleVersion {
                    path: args[0].clone(),
                    version,
                },
                indirect: is_indirect(comment),
            });
            Ok(())
        }
        "exclude" => {
            if args.len() != 2 {
                return Err("usage: exclude module/path v1.2.3".into());
            }
            let version = fix_version(&args[0], &args[1], fixer)?;
            manifest.excludes.push(ModuleVersion {
                path: args[0].clone(),
                version,
            });
            Ok(())
        }
        "replace" => {
            let replace = parse_replace(args, fixer)?;
            manifest.replaces.push(replace);
            Ok(())
        }
        "retract" => {
            let module_path = manifest.module.clone().unwrap_or_default();
            let retract = parse_retract(&module_path, args, fixer)?;
            manifest.retracts.push(retract);
            Ok(())
        }
        _ => Err(format!("unknown directive {verb:?}")),
    }
}

/// Parse `old [v] => new [v]` replace arguments
fn parse_replace(
    args: &[String],
    fixer: Option<&VersionFixer>,
) -> std::result::Result<Replace, String> {
    const USAGE: &str =
        "usage: replace module/path [v1.2.3] => other/module [v1.4.5] or directory";

    let arrow = args.iter().position(|tok| tok == "=>").ok_or(USAGE)?;
    let (old, new) = (&args[..arrow], &args[arrow + 1..]);
    if old.is_empty() || old.len() > 2 || new.is_empty() || new.len() > 2 {
        return Err(USAGE.into());
    }

    let old_version = match old.get(1) {
        Some(version) => Some(fix_version(&old[0], version, fixer)?),
        None => None,
    };

    let new_version = match new.get(1) {
        Some(version) => Some(fix_version(&new[0], version, fixer)?),
        None => {
            if !is_directory_path(&new[0]) {
                return Err(
                    "replacement module without version must be a directory path (rooted or starting with ./ or ../)"
                        .into(),
                );
            }
            None
        }
    };

    Ok(Replace {
        old_path: old[0].clone(),
        old_version,
        new_path: new[0].clone(),
        new_version,
    })
}

/// Parse `v1.2.3` or `[v1.2.3, v1.4.5]` retract arguments
fn parse_retract(
    module_path: &str,
    args: &[String],
    fixer: Option<&VersionFixer>,
) -> std::result::Result<Retract, String> {
    const USAGE: &str = "usage: retract v1.2.3 or retract [v1.2.3, v1.4.5]";

    let joined = args.join(" ");
    if let Some(inner) = joined.strip_prefix('[') {
        let inner = inner.strip_suffix(']').ok_or(USAGE)?;
        let bounds: Vec<&str> = inner.split(',').map(str::trim).collect();
        if bounds.len() != 2 {
            return Err(USAGE.into());
        }
        return Ok(Retract {
            low: fix_version(module_path, bounds[0], fixer)?,
            high: fix_version(module_path, bounds[1], fixer)?,
        });
    }

    if args.len() != 1 {
        return Err(USAGE.into());
    }
    let version = fix_version(module_path, &args[0], fixer)?;
    Ok(Retract::single(version))
}

/// Run the version fixer, then validate the resulting version string
fn fix_version(
    module_path: &str,
    version: &str,
    fixer: Option<&VersionFixer>,
) -> std::result::Result<String, String> {
    let version = match fixer {
        Some(fix) => fix(module_path, version).map_err(|err| err.to_string())?,
        None => version.to_string(),
    };
    if !version.starts_with('v') || version.len() < 2 {
        return Err(format!("invalid version {version:?}: must start with \"v\""));
    }
    Ok(version)
}

fn is_block_verb(verb: &str) -> bool {
    matches!(verb, "require" | "exclude" | "replace" | "retract")
}

fn is_go_version(version: &str) -> bool {
    let mut chars = version.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_digit())
        && chars.all(|c| c.is_ascii_digit() || c == '.')
}

fn is_directory_path(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../") || path.starts_with('/')
}

fn is_indirect(comment: Option<&str>) -> bool {
    match comment {
        Some(text) => {
            let text = text.trim();
            text == "indirect" || text.starts_with("indirect ")
        }
        None => false,
    }
}

fn parse_error(path: &Path, lineno: usize, message: String) -> WalkError {
    WalkError::manifest_parse(path, format!("line {lineno}: {message}"))
}

/// Split a line into tokens and an optional trailing `//` comment.
///
/// Double-quoted strings (with backslash escapes) and backquoted raw
/// strings form single tokens. Returns an error message on an unterminated
/// string.
fn tokenize(line: &str) -> std::result::Result<(Vec<String>, Option<String>), String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else { break };

        if first == '/' {
            let mut lookahead = chars.clone();
            lookahead.next();
            if lookahead.peek() == Some(&'/') {
                let rest: String = lookahead.skip(1).collect();
                let comment = rest.trim().to_string();
                return Ok((tokens, Some(comment)));
            }
        }

        if first == '"' {
            chars.next();
            let mut token = String::new();
            let mut terminated = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        terminated = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some(escaped) => token.push(escaped),
                        None => break,
                    },
                    _ => token.push(c),
                }
            }
            if !terminated {
                return Err("unterminated quoted string".into());
            }
            tokens.push(token);
            continue;
        }

        if first == '`' {
            chars.next();
            let mut token = String::new();
            let mut terminated = false;
            for c in chars.by_ref() {
                if c == '`' {
                    terminated = true;
                    break;
                }
                token.push(c);
            }
            if !terminated {
                return Err("unterminated raw string".into());
            }
            tokens.push(token);
            continue;
        }

        let mut token = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            if c == '/' {
                let mut lookahead = chars.clone();
                lookahead.next();
                if lookahead.peek() == Some(&'/') {
                    break;
                }
            }
            token.push(c);
            chars.next();
        }
        tokens.push(token);
    }

    Ok((tokens, None))
}
