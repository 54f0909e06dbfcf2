use std::path::Path;

use swc_ecma_ast::{
    ArrowExpr, BlockStmtOrExpr, CallExpr, Callee, Class, ClassMember, Expr, Function,
    JSXElementName, JSXObject, Lit, ObjectPatProp, ParamOrTsParamProp, Pat, PropName, Stmt,
};

/// Component names start with an uppercase ASCII letter
pub fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `src/pages/settings.tsx` generates `Settings`
pub fn component_name_from_file(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }
    Some(capitalize_first(stem))
}

/// `./pages/Settings` and `./pages/Settings.tsx` both generate `Settings`
pub fn component_name_from_module(specifier: &str) -> Option<String> {
    let last_segment = specifier.rsplit(['/', '\\']).next()?;
    component_name_from_file(Path::new(last_segment))
}

/// Strips parentheses and type-only wrappers, e.g. `(foo as Bar)!`
pub fn unwrap_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_expr(&paren.expr),
        Expr::TsAs(e) => unwrap_expr(&e.expr),
        Expr::TsSatisfies(e) => unwrap_expr(&e.expr),
        Expr::TsNonNull(e) => unwrap_expr(&e.expr),
        Expr::TsTypeAssertion(e) => unwrap_expr(&e.expr),
        Expr::TsConstAssertion(e) => unwrap_expr(&e.expr),
        _ => expr,
    }
}

/// Splits a callee into an optional namespace and the called name.
///
/// `memo(..)` generates `(None, "memo")`, `React.memo(..)` generates
/// `(Some("React"), "memo")`. Anything more complex generates `None`.
pub fn callee_parts(callee: &Callee) -> Option<(Option<&str>, &str)> {
    let Callee::Expr(callee) = callee else {
        return None;
    };
    match unwrap_expr(callee) {
        Expr::Ident(ident) => Some((None, &*ident.sym)),
        Expr::Member(member) => {
            let prop = member.prop.as_ident()?;
            match unwrap_expr(&member.obj) {
                Expr::Ident(obj) => Some((Some(&*obj.sym), &*prop.sym)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Name of the method being called, for any `<expr>.method(..)` call
pub fn called_method_name(callee: &Callee) -> Option<&str> {
    let Callee::Expr(callee) = callee else {
        return None;
    };
    match unwrap_expr(callee) {
        Expr::Member(member) => member.prop.as_ident().map(|prop| &*prop.sym),
        _ => None,
    }
}

/// True for `name(..)` and `React.name(..)`
pub fn is_react_call(call: &CallExpr, name: &str) -> bool {
    match callee_parts(&call.callee) {
        Some((None, called)) | Some((Some("React"), called)) => called == name,
        _ => false,
    }
}

pub fn first_arg(call: &CallExpr) -> Option<&Expr> {
    call.args
        .first()
        .filter(|arg| arg.spread.is_none())
        .map(|arg| unwrap_expr(&arg.expr))
}

pub fn string_literal(expr: &Expr) -> Option<String> {
    match unwrap_expr(expr) {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .map(|quasi| match &quasi.cooked {
                Some(cooked) => cooked.to_string(),
                None => quasi.raw.to_string(),
            }),
        _ => None,
    }
}

/// `() => import('./Settings')` generates `"./Settings"`
pub fn dynamic_import_specifier(expr: &Expr) -> Option<String> {
    let returned = match unwrap_expr(expr) {
        Expr::Arrow(ArrowExpr { body, .. }) => match &**body {
            BlockStmtOrExpr::Expr(expr) => Some(&**expr),
            BlockStmtOrExpr::BlockStmt(block) => first_returned_expr(&block.stmts),
        },
        Expr::Fn(fn_expr) => fn_expr
            .function
            .body
            .as_ref()
            .and_then(|body| first_returned_expr(&body.stmts)),
        _ => None,
    }?;

    match unwrap_expr(returned) {
        Expr::Call(call) if matches!(call.callee, Callee::Import(_)) => {
            first_arg(call).and_then(string_literal)
        }
        _ => None,
    }
}

fn first_returned_expr(stmts: &[Stmt]) -> Option<&Expr> {
    stmts.iter().find_map(|stmt| match stmt {
        Stmt::Return(ret) => ret.arg.as_deref(),
        _ => None,
    })
}

/// Keys of a destructured props parameter: `({ a, b: renamed, c = 1, ...rest })`
/// generates `["a", "b", "c"]`. Any other parameter shape has no known props.
pub fn props_of_pat(pat: &Pat) -> Vec<String> {
    let object = match pat {
        Pat::Object(object) => object,
        // `({ a } = {})`
        Pat::Assign(assign) => match &*assign.left {
            Pat::Object(object) => object,
            _ => return vec![],
        },
        _ => return vec![],
    };

    object
        .props
        .iter()
        .filter_map(|prop| match prop {
            ObjectPatProp::KeyValue(kv) => prop_name_str(&kv.key),
            ObjectPatProp::Assign(assign) => Some(assign.key.sym.to_string()),
            ObjectPatProp::Rest(_) => None,
        })
        .collect()
}

fn prop_name_str(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string()),
        _ => None,
    }
}

pub fn props_of_function(function: &Function) -> Vec<String> {
    function
        .params
        .first()
        .map(|param| props_of_pat(&param.pat))
        .unwrap_or_default()
}

pub fn props_of_arrow(arrow: &ArrowExpr) -> Vec<String> {
    arrow.params.first().map(props_of_pat).unwrap_or_default()
}

/// Props of a class come from its constructor's first parameter, if any
pub fn props_of_class(class: &Class) -> Vec<String> {
    class
        .body
        .iter()
        .find_map(|member| match member {
            ClassMember::Constructor(constructor) => Some(constructor),
            _ => None,
        })
        .and_then(|constructor| constructor.params.first())
        .map(|param| match param {
            ParamOrTsParamProp::Param(param) => props_of_pat(&param.pat),
            ParamOrTsParamProp::TsParamProp(_) => vec![],
        })
        .unwrap_or_default()
}

/// Simple tag names only: `<Header>` generates `Header`, `<ui.Button>` generates nothing
pub fn jsx_ident_name(name: &JSXElementName) -> Option<&str> {
    match name {
        JSXElementName::Ident(ident) => Some(&*ident.sym),
        _ => None,
    }
}

/// Full tag names, including member tags: `<React.StrictMode>` generates `React.StrictMode`
pub fn jsx_full_name(name: &JSXElementName) -> Option<String> {
    match name {
        JSXElementName::Ident(ident) => Some(ident.sym.to_string()),
        JSXElementName::JSXMemberExpr(member) => {
            let obj = jsx_object_name(&member.obj)?;
            Some(format!("{}.{}", obj, member.prop.sym))
        }
        JSXElementName::JSXNamespacedName(_) => None,
    }
}

fn jsx_object_name(obj: &JSXObject) -> Option<String> {
    match obj {
        JSXObject::Ident(ident) => Some(ident.sym.to_string()),
        JSXObject::JSXMemberExpr(member) => {
            let obj = jsx_object_name(&member.obj)?;
            Some(format!("{}.{}", obj, member.prop.sym))
        }
    }
}

/// `React.StrictMode` generates `StrictMode`
pub fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
