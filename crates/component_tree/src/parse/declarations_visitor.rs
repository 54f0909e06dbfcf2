use std::path::{Path, PathBuf};

use ahash::AHashSet;
use logger_srcfile::SrcFileLogger;
use swc_common::Spanned;
use swc_ecma_ast::{
    ClassDecl, DefaultDecl, ExportDefaultDecl, ExportDefaultExpr, Expr, FnDecl,
    JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXExpr, Lit, Pat,
    VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::{
    utils::{
        component_name_from_file, component_name_from_module, dynamic_import_specifier,
        first_arg, is_component_name, is_react_call, jsx_ident_name, props_of_arrow,
        props_of_class, props_of_function, string_literal, unwrap_expr,
    },
    ComponentDeclaration, RouteDeclaration, DYNAMIC_ROUTE_PATH,
};
use crate::cfg::ComponentTreeConfig;

/// What a binding initializer or default-exported expression turned out to be
enum ComponentShape {
    /// A function or arrow function with these props
    Function(Vec<String>),
    /// `lazy(() => import('./Settings'))`, named after the imported module
    Lazy(String),
}

/// AST visitor that collects the components declared in a file, the
/// components it renders, and the routes it declares.
pub struct DeclarationsVisitor<'a, TLogger: SrcFileLogger> {
    config: &'a ComponentTreeConfig,
    file_path: &'a Path,
    logger: TLogger,
    // `function Header() {}` generates `[{ name: "Header", props: [] }]`
    pub components: Vec<ComponentDeclaration>,
    // `<Header /><Body /><Header />` generates `["Header", "Body"]`
    pub used_components: Vec<String>,
    seen_usages: AHashSet<String>,
    // `<Route path="/x" component={Page} />` generates `[{ path: "/x", component: "Page" }]`
    pub routes: Vec<RouteDeclaration>,
}

impl<'a, TLogger: SrcFileLogger> DeclarationsVisitor<'a, TLogger> {
    pub fn new(config: &'a ComponentTreeConfig, file_path: &'a Path, logger: TLogger) -> Self {
        Self {
            config,
            file_path,
            logger,
            components: Vec::new(),
            used_components: Vec::new(),
            seen_usages: AHashSet::default(),
            routes: Vec::new(),
        }
    }

    fn declare(&mut self, name: impl Into<String>, props: Vec<String>) {
        self.components.push(ComponentDeclaration {
            name: name.into(),
            defined_in: PathBuf::from(self.file_path),
            props,
        });
    }

    fn record_usage(&mut self, name: &str) {
        if self.seen_usages.insert(name.to_string()) {
            self.used_components.push(name.to_string());
        }
    }

    /// Name used for anonymous default exports
    fn file_component_name(&self) -> Option<String> {
        component_name_from_file(self.file_path)
    }

    /// Classifies an expression that may define a component.
    ///
    /// Supported syntax list:
    /// - `function () {}` and `() => {}`
    /// - `memo(() => {})` and `React.memo(function () {})`, unwrapped one layer
    /// - `lazy(() => import('./Settings'))` and `React.lazy(..)`
    fn classify(&self, expr: &Expr) -> Option<ComponentShape> {
        match unwrap_expr(expr) {
            Expr::Arrow(arrow) => Some(ComponentShape::Function(props_of_arrow(arrow))),
            Expr::Fn(fn_expr) => Some(ComponentShape::Function(props_of_function(
                &fn_expr.function,
            ))),
            Expr::Call(call) if is_react_call(call, "memo") => match first_arg(call)? {
                Expr::Arrow(arrow) => Some(ComponentShape::Function(props_of_arrow(arrow))),
                Expr::Fn(fn_expr) => Some(ComponentShape::Function(props_of_function(
                    &fn_expr.function,
                ))),
                _ => None,
            },
            Expr::Call(call) if is_react_call(call, "lazy") => {
                let specifier = first_arg(call).and_then(dynamic_import_specifier)?;
                component_name_from_module(&specifier).map(ComponentShape::Lazy)
            }
            _ => None,
        }
    }

    /// For `memo(function Named() {})`, the inner function's own name
    fn memo_inner_name(expr: &Expr) -> Option<String> {
        let Expr::Call(call) = unwrap_expr(expr) else {
            return None;
        };
        if !is_react_call(call, "memo") {
            return None;
        }
        match first_arg(call)? {
            Expr::Fn(fn_expr) => fn_expr.ident.as_ref().map(|ident| ident.sym.to_string()),
            _ => None,
        }
    }

    /// Name for a default export: its own identifier if it has one, otherwise
    /// the capitalized file name. A lowercase identifier is not a component.
    fn default_export_name(&self, ident: Option<&str>) -> Option<String> {
        match ident {
            Some(name) if is_component_name(name) => Some(name.to_string()),
            Some(_) => None,
            None => self.file_component_name(),
        }
    }

    fn handle_route_element(&mut self, element: &JSXElement) {
        let mut path: Option<String> = None;
        let mut target: Option<String> = None;

        for attr in element.opening.attrs.iter() {
            let JSXAttrOrSpread::JSXAttr(attr) = attr else {
                continue;
            };
            let JSXAttrName::Ident(attr_name) = &attr.name else {
                continue;
            };
            let attr_name = &*attr_name.sym;
            if attr_name == "path" {
                path = Some(route_path(attr));
            } else if self.config.is_route_target_attribute(attr_name) {
                if let Some(name) = route_target(attr) {
                    target = Some(name);
                }
            }
        }

        match (path, target) {
            (Some(path), Some(component)) => self.routes.push(RouteDeclaration { path, component }),
            (None, _) => self.logger.src_warn(
                &element.span(),
                format!("ignoring <{}> without a path", self.config.route_tag),
            ),
            (_, None) => self.logger.src_warn(
                &element.span(),
                format!("ignoring <{}> without a target component", self.config.route_tag),
            ),
        }
    }
}

/// `path="/x"` and `path={"/x"}` generate `/x`, anything else is dynamic
fn route_path(attr: &JSXAttr) -> String {
    let literal = match &attr.value {
        Some(JSXAttrValue::Lit(Lit::Str(s))) => Some(s.value.to_string()),
        Some(JSXAttrValue::JSXExprContainer(container)) => match &container.expr {
            JSXExpr::Expr(expr) => string_literal(expr),
            JSXExpr::JSXEmptyExpr(_) => None,
        },
        _ => None,
    };
    literal.unwrap_or_else(|| DYNAMIC_ROUTE_PATH.to_string())
}

/// `component={Page}`, `element={<Page />}` and `component=<Page />` generate `Page`
fn route_target(attr: &JSXAttr) -> Option<String> {
    match attr.value.as_ref()? {
        JSXAttrValue::JSXExprContainer(container) => match &container.expr {
            JSXExpr::Expr(expr) => match unwrap_expr(expr) {
                Expr::Ident(ident) => Some(ident.sym.to_string()),
                Expr::JSXElement(element) => {
                    jsx_ident_name(&element.opening.name).map(str::to_string)
                }
                _ => None,
            },
            JSXExpr::JSXEmptyExpr(_) => None,
        },
        JSXAttrValue::JSXElement(element) => {
            jsx_ident_name(&element.opening.name).map(str::to_string)
        }
        _ => None,
    }
}

impl<TLogger: SrcFileLogger> Visit for DeclarationsVisitor<'_, TLogger> {
    // function Header({ title }) {}
    fn visit_fn_decl(&mut self, decl: &FnDecl) {
        decl.visit_children_with(self);
        if is_component_name(&decl.ident.sym) {
            self.declare(decl.ident.sym.to_string(), props_of_function(&decl.function));
        }
    }

    // const Header = () => {}, const Header = memo(..), const Settings = lazy(..)
    fn visit_var_declarator(&mut self, decl: &VarDeclarator) {
        decl.visit_children_with(self);
        let Pat::Ident(binding) = &decl.name else {
            return;
        };
        if !is_component_name(&binding.id.sym) {
            return;
        }
        let Some(init) = &decl.init else {
            return;
        };
        match self.classify(init) {
            Some(ComponentShape::Function(props)) => {
                self.declare(binding.id.sym.to_string(), props);
            }
            Some(ComponentShape::Lazy(module_name)) => {
                self.declare(module_name, vec![]);
            }
            None => {}
        }
    }

    // class Header extends Component { constructor({ title }) {} }
    fn visit_class_decl(&mut self, decl: &ClassDecl) {
        decl.visit_children_with(self);
        if is_component_name(&decl.ident.sym) {
            self.declare(decl.ident.sym.to_string(), props_of_class(&decl.class));
        }
    }

    // export default function App() {}, export default class extends Component {}
    fn visit_export_default_decl(&mut self, export: &ExportDefaultDecl) {
        export.visit_children_with(self);
        match &export.decl {
            DefaultDecl::Fn(fn_expr) => {
                let ident = fn_expr.ident.as_ref().map(|ident| &*ident.sym);
                if let Some(name) = self.default_export_name(ident) {
                    self.declare(name, props_of_function(&fn_expr.function));
                }
            }
            DefaultDecl::Class(class_expr) => {
                let ident = class_expr.ident.as_ref().map(|ident| &*ident.sym);
                if let Some(name) = self.default_export_name(ident) {
                    self.declare(name, props_of_class(&class_expr.class));
                }
            }
            DefaultDecl::TsInterfaceDecl(_) => {}
        }
    }

    // export default () => {}, export default memo(..), export default lazy(..)
    fn visit_export_default_expr(&mut self, export: &ExportDefaultExpr) {
        export.visit_children_with(self);
        let expr = unwrap_expr(&export.expr);
        if let Expr::Class(class_expr) = expr {
            let ident = class_expr.ident.as_ref().map(|ident| &*ident.sym);
            if let Some(name) = self.default_export_name(ident) {
                self.declare(name, props_of_class(&class_expr.class));
            }
            return;
        }

        match self.classify(expr) {
            Some(ComponentShape::Function(props)) => {
                let own_name = match expr {
                    Expr::Fn(fn_expr) => fn_expr.ident.as_ref().map(|ident| ident.sym.to_string()),
                    _ => Self::memo_inner_name(expr),
                };
                if let Some(name) = self.default_export_name(own_name.as_deref()) {
                    self.declare(name, props);
                }
            }
            Some(ComponentShape::Lazy(module_name)) => {
                self.declare(module_name, vec![]);
            }
            // `export default App;`, `export default { ... }`
            None => {}
        }
    }

    fn visit_jsx_element(&mut self, element: &JSXElement) {
        if let Some(name) = jsx_ident_name(&element.opening.name) {
            if is_component_name(name) {
                self.record_usage(name);
            }
            if name == self.config.route_tag {
                self.handle_route_element(element);
            }
        }
        element.visit_children_with(self);
    }
}
