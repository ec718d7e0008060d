//! Pure functions from the Terraform standard library
//!
//! Terragrunt configs routinely compute non-Atlantis locals with these
//! (`basename(get_terragrunt_dir())`, `merge(...)`, `jsondecode(...)`). They
//! are declared next to the Terragrunt helpers so such locals evaluate instead
//! of failing the whole `locals` block.

use hcl::eval::{Context, FuncArgs, FuncDef, ParamType};
use hcl::{Map, Value};

/// Declare every standard function on `ctx`.
pub fn declare_std_functions(ctx: &mut Context<'_>) {
    let string = || ParamType::String;
    let any = || ParamType::Any;

    let unary_string: [(&str, fn(FuncArgs) -> Result<Value, String>); 6] = [
        ("basename", basename),
        ("dirname", dirname),
        ("lower", lower),
        ("upper", upper),
        ("trimspace", trimspace),
        ("jsondecode", jsondecode),
    ];
    for (name, func) in unary_string {
        ctx.declare_func(name, FuncDef::builder().param(string()).build(func));
    }

    let binary_string: [(&str, fn(FuncArgs) -> Result<Value, String>); 4] = [
        ("trimprefix", trimprefix),
        ("trimsuffix", trimsuffix),
        ("startswith", startswith),
        ("endswith", endswith),
    ];
    for (name, func) in binary_string {
        ctx.declare_func(name, FuncDef::builder().params([string(), string()]).build(func));
    }

    ctx.declare_func(
        "replace",
        FuncDef::builder().params([string(), string(), string()]).build(replace),
    );
    ctx.declare_func("split", FuncDef::builder().params([string(), string()]).build(split));
    ctx.declare_func(
        "join",
        FuncDef::builder()
            .params([string(), ParamType::array_of(string())])
            .build(join),
    );
    ctx.declare_func(
        "format",
        FuncDef::builder().param(string()).variadic_param(any()).build(format),
    );
    ctx.declare_func("merge", FuncDef::builder().variadic_param(any()).build(merge));
    ctx.declare_func("concat", FuncDef::builder().variadic_param(any()).build(concat));
    ctx.declare_func("coalesce", FuncDef::builder().variadic_param(any()).build(coalesce));
    ctx.declare_func(
        "lookup",
        FuncDef::builder()
            .params([ParamType::object_of(any()), string()])
            .variadic_param(any())
            .build(lookup),
    );
    ctx.declare_func("length", FuncDef::builder().param(any()).build(length));
    ctx.declare_func("keys", FuncDef::builder().param(ParamType::object_of(any())).build(keys));
    ctx.declare_func(
        "values",
        FuncDef::builder().param(ParamType::object_of(any())).build(values),
    );
    ctx.declare_func(
        "contains",
        FuncDef::builder()
            .params([ParamType::array_of(any()), any()])
            .build(contains),
    );
    ctx.declare_func("flatten", FuncDef::builder().param(ParamType::array_of(any())).build(flatten));
    ctx.declare_func("tostring", FuncDef::builder().param(any()).build(tostring));
    ctx.declare_func("jsonencode", FuncDef::builder().param(any()).build(jsonencode));
}

fn str_arg(args: &FuncArgs, index: usize) -> Result<&str, String> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("expected a string argument at position {index}"))
}

/// Render a value the way string interpolation does.
fn display(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        other => serde_json::to_string(other).map_err(|e| e.to_string()),
    }
}

fn basename(args: FuncArgs) -> Result<Value, String> {
    let path = str_arg(&args, 0)?;
    let trimmed = path.trim_end_matches('/');
    let name = match trimmed.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ if path.starts_with('/') => "/",
        _ => ".",
    };
    Ok(Value::from(name))
}

fn dirname(args: FuncArgs) -> Result<Value, String> {
    let path = str_arg(&args, 0)?;
    let trimmed = path.trim_end_matches('/');
    let dir = match trimmed.rfind('/') {
        None if path.starts_with('/') => "/",
        None => ".",
        Some(index) => match trimmed[..index].trim_end_matches('/') {
            "" => "/",
            dir => dir,
        },
    };
    Ok(Value::from(dir))
}

fn lower(args: FuncArgs) -> Result<Value, String> {
    Ok(Value::from(str_arg(&args, 0)?.to_lowercase()))
}

fn upper(args: FuncArgs) -> Result<Value, String> {
    Ok(Value::from(str_arg(&args, 0)?.to_uppercase()))
}

fn trimspace(args: FuncArgs) -> Result<Value, String> {
    Ok(Value::from(str_arg(&args, 0)?.trim()))
}

fn trimprefix(args: FuncArgs) -> Result<Value, String> {
    let s = str_arg(&args, 0)?;
    let prefix = str_arg(&args, 1)?;
    Ok(Value::from(s.strip_prefix(prefix).unwrap_or(s)))
}

fn trimsuffix(args: FuncArgs) -> Result<Value, String> {
    let s = str_arg(&args, 0)?;
    let suffix = str_arg(&args, 1)?;
    Ok(Value::from(s.strip_suffix(suffix).unwrap_or(s)))
}

fn startswith(args: FuncArgs) -> Result<Value, String> {
    Ok(Value::Bool(str_arg(&args, 0)?.starts_with(str_arg(&args, 1)?)))
}

fn endswith(args: FuncArgs) -> Result<Value, String> {
    Ok(Value::Bool(str_arg(&args, 0)?.ends_with(str_arg(&args, 1)?)))
}

/// `replace(string, substring, replacement)`; the substring is literal.
fn replace(args: FuncArgs) -> Result<Value, String> {
    let s = str_arg(&args, 0)?;
    Ok(Value::from(s.replace(str_arg(&args, 1)?, str_arg(&args, 2)?)))
}

/// `split(separator, string)`
fn split(args: FuncArgs) -> Result<Value, String> {
    let separator = str_arg(&args, 0)?;
    let s = str_arg(&args, 1)?;
    if s.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    Ok(s.split(separator).map(Value::from).collect())
}

/// `join(separator, list)`
fn join(args: FuncArgs) -> Result<Value, String> {
    let separator = str_arg(&args, 0)?;
    let items = args
        .get(1)
        .and_then(Value::as_array)
        .ok_or_else(|| "join expects a list of strings".to_string())?;
    let parts = items.iter().map(display).collect::<Result<Vec<_>, _>>()?;
    Ok(Value::from(parts.join(separator)))
}

/// `format(spec, args...)` with the `%s`, `%d`, `%v`, `%q` and `%%` verbs.
fn format(args: FuncArgs) -> Result<Value, String> {
    let spec = str_arg(&args, 0)?;
    let mut values = args.iter().skip(1);
    let mut out = String::with_capacity(spec.len());
    let mut chars = spec.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let verb = chars
            .next()
            .ok_or_else(|| "format string ends with a lone %".to_string())?;
        if verb == '%' {
            out.push('%');
            continue;
        }
        let value = values
            .next()
            .ok_or_else(|| format!("not enough arguments for %{verb}"))?;
        match verb {
            's' | 'v' => out.push_str(&display(value)?),
            'd' => match value.as_i64() {
                Some(n) => out.push_str(&n.to_string()),
                None => return Err(format!("%d expects an integer, got {value}")),
            },
            'q' => out.push_str(&serde_json::to_string(&display(value)?).map_err(|e| e.to_string())?),
            other => return Err(format!("unsupported format verb %{other}")),
        }
    }

    Ok(Value::from(out))
}

/// Later objects win on conflicting keys; `null` arguments are skipped.
fn merge(args: FuncArgs) -> Result<Value, String> {
    let mut merged = Map::new();
    for arg in args.iter() {
        match arg {
            Value::Null => {}
            Value::Object(object) => {
                for (key, value) in object {
                    merged.insert(key.clone(), value.clone());
                }
            }
            other => return Err(format!("merge expects objects, got {other}")),
        }
    }
    Ok(Value::Object(merged))
}

fn concat(args: FuncArgs) -> Result<Value, String> {
    let mut items = Vec::new();
    for arg in args.iter() {
        match arg {
            Value::Array(list) => items.extend(list.iter().cloned()),
            other => return Err(format!("concat expects lists, got {other}")),
        }
    }
    Ok(Value::Array(items))
}

/// The first argument that is neither `null` nor an empty string.
fn coalesce(args: FuncArgs) -> Result<Value, String> {
    args.iter()
        .find(|value| !value.is_null() && value.as_str() != Some(""))
        .cloned()
        .ok_or_else(|| "no non-null, non-empty-string arguments".to_string())
}

/// `lookup(map, key[, default])`
fn lookup(args: FuncArgs) -> Result<Value, String> {
    let key = str_arg(&args, 1)?;
    let found = args
        .first()
        .and_then(Value::as_object)
        .and_then(|map| map.get(key));
    match (found, args.get(2)) {
        (Some(value), _) => Ok(value.clone()),
        (None, Some(default)) => Ok(default.clone()),
        (None, None) => Err(format!("lookup failed to find key {key:?}")),
    }
}

fn length(args: FuncArgs) -> Result<Value, String> {
    match args.first() {
        Some(Value::String(s)) => Ok(Value::from(s.chars().count())),
        Some(Value::Array(items)) => Ok(Value::from(items.len())),
        Some(Value::Object(map)) => Ok(Value::from(map.len())),
        Some(other) => Err(format!("length expects a string or collection, got {other}")),
        None => Err("length expects one argument".to_string()),
    }
}

fn sorted_entries(args: &FuncArgs) -> Result<Vec<(&String, &Value)>, String> {
    let map = args
        .first()
        .and_then(Value::as_object)
        .ok_or_else(|| "expected an object".to_string())?;
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    Ok(entries)
}

/// Keys in lexicographic order.
fn keys(args: FuncArgs) -> Result<Value, String> {
    Ok(sorted_entries(&args)?
        .into_iter()
        .map(|(key, _)| Value::from(key.as_str()))
        .collect())
}

/// Values in the lexicographic order of their keys.
fn values(args: FuncArgs) -> Result<Value, String> {
    Ok(sorted_entries(&args)?
        .into_iter()
        .map(|(_, value)| value.clone())
        .collect())
}

fn contains(args: FuncArgs) -> Result<Value, String> {
    let list = args
        .first()
        .and_then(Value::as_array)
        .ok_or_else(|| "contains expects a list".to_string())?;
    let needle = args.get(1).cloned().unwrap_or(Value::Null);
    Ok(Value::Bool(list.contains(&needle)))
}

fn flatten(args: FuncArgs) -> Result<Value, String> {
    fn flatten_into(items: &[Value], out: &mut Vec<Value>) {
        for item in items {
            match item {
                Value::Array(nested) => flatten_into(nested, out),
                other => out.push(other.clone()),
            }
        }
    }

    let list = args
        .first()
        .and_then(Value::as_array)
        .ok_or_else(|| "flatten expects a list".to_string())?;
    let mut out = Vec::new();
    flatten_into(list, &mut out);
    Ok(Value::Array(out))
}

fn tostring(args: FuncArgs) -> Result<Value, String> {
    match args.first() {
        Some(Value::Null) => Ok(Value::Null),
        Some(value @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => {
            Ok(Value::from(display(value)?))
        }
        Some(other) => Err(format!("cannot convert {other} to a string")),
        None => Err("tostring expects one argument".to_string()),
    }
}

fn jsondecode(args: FuncArgs) -> Result<Value, String> {
    let json: serde_json::Value =
        serde_json::from_str(str_arg(&args, 0)?).map_err(|e| e.to_string())?;
    hcl::to_value(json).map_err(|e| e.to_string())
}

fn jsonencode(args: FuncArgs) -> Result<Value, String> {
    let value = args.first().cloned().unwrap_or(Value::Null);
    serde_json::to_string(&value)
        .map(Value::from)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl::eval::Evaluate;
    use rstest::rstest;

    fn eval(expr: &str) -> Result<Value, String> {
        let body = hcl::parse(&format!("v = {expr}\n")).unwrap();
        let attr = body.attributes().next().unwrap();
        let mut ctx = Context::new();
        declare_std_functions(&mut ctx);
        attr.expr().evaluate(&ctx).map_err(|e| e.to_string())
    }

    fn string(expr: &str) -> String {
        match eval(expr).unwrap() {
            Value::String(s) => s,
            other => panic!("{expr} evaluated to {other:?}"),
        }
    }

    #[rstest]
    #[case(r#"basename("/repo/live/prod")"#, "prod")]
    #[case(r#"basename("/repo/live/prod/")"#, "prod")]
    #[case(r#"basename("file.hcl")"#, "file.hcl")]
    #[case(r#"basename("/")"#, "/")]
    #[case(r#"dirname("/repo/live/prod")"#, "/repo/live")]
    #[case(r#"dirname("/repo")"#, "/")]
    #[case(r#"dirname("file.hcl")"#, ".")]
    #[case(r#"lower("PROD")"#, "prod")]
    #[case(r#"upper("prod")"#, "PROD")]
    #[case(r#"trimspace("  x \n")"#, "x")]
    #[case(r#"trimprefix("env-prod", "env-")"#, "prod")]
    #[case(r#"trimsuffix("app.hcl", ".hcl")"#, "app")]
    #[case(r#"replace("a/b/c", "/", "-")"#, "a-b-c")]
    #[case(r#"join(",", ["a", "b"])"#, "a,b")]
    #[case(r#"format("%s-%d (%v) %%", "app", 3, true)"#, "app-3 (true) %")]
    #[case(r#"format("%q", "x")"#, "\"x\"")]
    #[case(r#"lookup({a = "1"}, "b", "fallback")"#, "fallback")]
    #[case(r#"coalesce("", "second")"#, "second")]
    #[case(r#"tostring(5)"#, "5")]
    #[case(r#"jsonencode({a = [1, true]})"#, r#"{"a":[1,true]}"#)]
    fn string_functions(#[case] expr: &str, #[case] expected: &str) {
        assert_eq!(string(expr), expected);
    }

    #[test]
    fn merge_later_objects_win() {
        let merged = eval(r#"merge({a = 1, b = 1}, null, {b = 2, c = 3})"#).unwrap();
        let expected: Value = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(merged, expected);
    }

    #[test]
    fn collection_functions() {
        assert_eq!(eval(r#"concat(["a"], [], ["b", "c"])"#).unwrap(), Value::from(vec!["a", "b", "c"]));
        assert_eq!(eval(r#"split("/", "a/b")"#).unwrap(), Value::from(vec!["a", "b"]));
        assert_eq!(eval(r#"split("/", "")"#).unwrap(), Value::Array(Vec::new()));
        assert_eq!(eval(r#"keys({b = 1, a = 2})"#).unwrap(), Value::from(vec!["a", "b"]));
        assert_eq!(eval(r#"values({b = 1, a = 2})"#).unwrap(), Value::from(vec![2, 1]));
        assert_eq!(eval(r#"length("abc")"#).unwrap(), Value::from(3));
        assert_eq!(eval(r#"length({a = 1})"#).unwrap(), Value::from(1));
        assert_eq!(eval(r#"contains(["a", "b"], "b")"#).unwrap(), Value::Bool(true));
        assert_eq!(eval(r#"flatten([["a"], [["b"]], "c"])"#).unwrap(), Value::from(vec!["a", "b", "c"]));
        assert_eq!(eval(r#"startswith("prod-eu", "prod")"#).unwrap(), Value::Bool(true));
    }

    #[test]
    fn jsondecode_yields_hcl_values() {
        assert_eq!(
            eval(r#"lookup(jsondecode("{\"workflow\": \"custom\"}"), "workflow")"#).unwrap(),
            Value::from("custom")
        );
        assert!(eval(r#"jsondecode("{ nope")"#).is_err());
    }

    #[test]
    fn lookup_without_default_fails_on_missing_key() {
        assert!(eval(r#"lookup({a = 1}, "b")"#).is_err());
    }

    #[test]
    fn format_rejects_missing_arguments() {
        assert!(eval(r#"format("%s-%s", "only")"#).is_err());
    }
}
