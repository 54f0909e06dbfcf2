use swc_ecma_ast::{CallExpr, Expr, JSXElement, JSXElementChild, JSXExpr, JSXFragment};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    cfg::ComponentTreeConfig,
    parse::utils::{callee_parts, called_method_name, is_component_name, jsx_full_name, unwrap_expr},
};

const ROOT_METHODS: [&str; 4] = ["render", "hydrate", "createRoot", "hydrateRoot"];
const BARE_ROOT_CALLS: [&str; 2] = ["createRoot", "hydrateRoot"];
const RENDER_METHODS: [&str; 2] = ["render", "hydrate"];

/// True for calls that mount the application:
/// `ReactDOM.render(..)`, `ReactDOM.createRoot(..)` and bare `createRoot(..)`
pub fn is_root_render_call(call: &CallExpr, config: &ComponentTreeConfig) -> bool {
    match callee_parts(&call.callee) {
        Some((Some(namespace), method)) => {
            config.is_render_namespace(namespace) && ROOT_METHODS.contains(&method)
        }
        Some((None, called)) => BARE_ROOT_CALLS.contains(&called),
        None => false,
    }
}

/// Calls whose markup argument is the mounted tree. In addition to the root
/// render calls, this covers `root.render(<App />)` on a created root.
fn is_render_call(call: &CallExpr, config: &ComponentTreeConfig) -> bool {
    is_root_render_call(call, config)
        || called_method_name(&call.callee).is_some_and(|method| RENDER_METHODS.contains(&method))
}

/// Finds root render calls in a module, and the components mounted by the
/// first render call that is passed markup.
pub struct RootRenderVisitor<'a> {
    config: &'a ComponentTreeConfig,
    pub renders_root: bool,
    // `root.render(<StrictMode><App /></StrictMode>)` generates `["StrictMode", "App"]`
    pub render_chain: Option<Vec<String>>,
}

impl<'a> RootRenderVisitor<'a> {
    pub fn new(config: &'a ComponentTreeConfig) -> Self {
        Self {
            config,
            renders_root: false,
            render_chain: None,
        }
    }
}

impl Visit for RootRenderVisitor<'_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if is_root_render_call(call, self.config) {
            self.renders_root = true;
        }
        if self.render_chain.is_none() && is_render_call(call, self.config) {
            let markup = call
                .args
                .iter()
                .filter(|arg| arg.spread.is_none())
                .map(|arg| unwrap_expr(&arg.expr))
                .find(|expr| matches!(expr, Expr::JSXElement(_) | Expr::JSXFragment(_)));
            if let Some(markup) = markup {
                self.render_chain = Some(collect_markup_chain(markup));
            }
        }
        call.visit_children_with(self);
    }
}

/// Capitalized tag names of a markup tree in document order, depth first.
///
/// Siblings are chained like nesting: `<Provider><App /><Toaster /></Provider>`
/// generates `["Provider", "App", "Toaster"]`.
pub fn collect_markup_chain(expr: &Expr) -> Vec<String> {
    let mut chain = Vec::new();
    match unwrap_expr(expr) {
        Expr::JSXElement(element) => collect_element(element, &mut chain),
        Expr::JSXFragment(fragment) => collect_fragment(fragment, &mut chain),
        _ => {}
    }
    chain
}

fn collect_element(element: &JSXElement, chain: &mut Vec<String>) {
    if let Some(name) = jsx_full_name(&element.opening.name) {
        if is_component_name(&name) {
            chain.push(name);
        }
    }
    collect_children(&element.children, chain);
}

fn collect_fragment(fragment: &JSXFragment, chain: &mut Vec<String>) {
    collect_children(&fragment.children, chain);
}

fn collect_children(children: &[JSXElementChild], chain: &mut Vec<String>) {
    for child in children {
        match child {
            JSXElementChild::JSXElement(element) => collect_element(element, chain),
            JSXElementChild::JSXFragment(fragment) => collect_fragment(fragment, chain),
            JSXElementChild::JSXExprContainer(container) => {
                if let JSXExpr::Expr(expr) = &container.expr {
                    chain.extend(collect_markup_chain(expr));
                }
            }
            JSXElementChild::JSXText(_) | JSXElementChild::JSXSpreadChild(_) => {}
        }
    }
}
