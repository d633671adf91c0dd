//! Constraint text fixtures.

/// A single wildcard-heavy rule with a compound condition.
pub const TORCH_ONLY: &str = "\
torch !=2.0.1, !=2.0.0, !=1.13.*, !=1.12.*; python_version == '3.10' and platform_system == 'Windows'
";

/// Rules with comments, rationale blocks, a continuation and an inline comment.
pub const ANNOTATED: &str = r#"# Pins for the modeling stack

# first rationale line
# second rationale line
numpy != 1.25.0  # inline note

scipy != 1.11.0, \
      != 1.11.1; python_version >= "3.9"

Onnx_Runtime[gpu] (!= 1.14.0); sys_platform == 'darwin' or os_name == 'nt'
"#;

/// Each entry is `(text, failing line)` for a file whose only problem is
/// a malformed constraint.
pub const MALFORMED: &[(&str, usize)] = &[
    ("onnx 1.14.0\n", 1),
    ("# ok\n\n!= 1.0\n", 3),
    ("torch !=2.0.1,, !=2.0.0\n", 1),
    ("torch !=2.0.1;\n", 1),
    ("torch\n", 1),
    ("torch @ https://example.com/torch.whl\n", 1),
    ("torch !=1.12.*; python_version == \n", 1),
    ("torch !=1.12.*; machine_arch == 'x86_64'\n", 1),
    ("torch < 1.12.*\n", 1),
    ("numpy != 1.0\ntorch != 1.x\n", 2),
];

/// Each entry is `(text, offending operator)`.
pub const UNKNOWN_OPERATORS: &[(&str, &str)] = &[
    ("onnx => 1.14.0\n", "=>"),
    ("onnx === 1.14.0\n", "==="),
    ("ipython != 8.13.0; python_version <> '3.9'\n", "<>"),
    ("ipython != 8.13.0; python_version = '3.9'\n", "="),
    ("ipython != 8.13.0; platform_system in 'Windows Linux'\n", "in"),
    ("ipython != 8.13.0; platform_system < 'Windows'\n", "<"),
];
