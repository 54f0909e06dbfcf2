#[cfg(test)]
mod test {
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;

    use crate::cfg::ComponentTreeConfig;
    use crate::parse::{extract_file, ComponentDeclaration, FileExtraction, RouteDeclaration};

    fn extract(path: &str, src: &str) -> FileExtraction {
        extract_file(Path::new(path), src, &ComponentTreeConfig::default()).unwrap()
    }

    fn declared(extraction: &FileExtraction) -> Vec<(String, Vec<String>)> {
        extraction
            .components
            .iter()
            .map(|c| (c.name.clone(), c.props.clone()))
            .collect()
    }

    fn decl(name: &str, props: &[&str]) -> (String, Vec<String>) {
        (
            name.to_string(),
            props.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[test]
    fn test_function_declarations() {
        let extraction = extract(
            "src/Header.tsx",
            r#"
            export function Header({ title, subtitle }) {
                return <h1>{title}</h1>;
            }
            function helper(x) { return x; }
            function Footer(props) { return <footer />; }
            "#,
        );
        assert_eq!(
            extraction.components,
            vec![
                ComponentDeclaration {
                    name: "Header".to_string(),
                    defined_in: PathBuf::from("src/Header.tsx"),
                    props: vec!["title".to_string(), "subtitle".to_string()],
                },
                ComponentDeclaration {
                    name: "Footer".to_string(),
                    defined_in: PathBuf::from("src/Header.tsx"),
                    props: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_arrow_and_function_bindings() {
        let extraction = extract(
            "src/widgets.tsx",
            r#"
            export const Card = ({ title, body: content, footer = null, ...rest }) => <div />;
            const Panel = function ({ open }: { open: boolean }) { return <div />; };
            const Typed = (({ id }) => <div />) as React.FC<Props>;
            const lowercase = () => <div />;
            const Value = 42;
            "#,
        );
        assert_eq!(
            declared(&extraction),
            vec![
                decl("Card", &["title", "body", "footer"]),
                decl("Panel", &["open"]),
                decl("Typed", &["id"]),
            ]
        );
    }

    #[test]
    fn test_memo_unwraps_one_layer() {
        let extraction = extract(
            "src/List.tsx",
            r#"
            import React, { memo } from "react";
            export const List = memo(({ a, b }) => <ul />);
            export const Row = React.memo(function Row({ cells }) { return <tr />; });
            const Aliased = memo(List);
            "#,
        );
        assert_eq!(
            declared(&extraction),
            vec![decl("List", &["a", "b"]), decl("Row", &["cells"])]
        );
    }

    #[test]
    fn test_lazy_takes_module_name() {
        let extraction = extract(
            "src/routes.tsx",
            r#"
            import { lazy } from "react";
            const SettingsPage = lazy(() => import("./Settings"));
            const Profile = React.lazy(() => {
                return import("./pages/profile.tsx");
            });
            const NotAComponent = lazy(loadSomething);
            "#,
        );
        assert_eq!(
            declared(&extraction),
            vec![decl("Settings", &[]), decl("Profile", &[])]
        );
    }

    #[test]
    fn test_class_components() {
        let extraction = extract(
            "src/Legacy.jsx",
            r#"
            class Legacy extends React.Component {
                constructor({ initial, onChange }) {
                    super();
                }
                render() { return <Child />; }
            }
            class NoConstructor extends Component {
                render() { return null; }
            }
            "#,
        );
        assert_eq!(
            declared(&extraction),
            vec![
                decl("Legacy", &["initial", "onChange"]),
                decl("NoConstructor", &[])
            ]
        );
    }

    #[test]
    fn test_default_exports() {
        let named = extract(
            "src/App.tsx",
            "export default function App({ theme }) { return <main />; }",
        );
        assert_eq!(declared(&named), vec![decl("App", &["theme"])]);

        let anonymous_fn = extract(
            "src/pages/settings.tsx",
            "export default function ({ user }) { return <div />; }",
        );
        assert_eq!(declared(&anonymous_fn), vec![decl("Settings", &["user"])]);

        let anonymous_arrow = extract("src/pages/About.jsx", "export default () => <p />;");
        assert_eq!(declared(&anonymous_arrow), vec![decl("About", &[])]);

        let memo_default = extract(
            "src/Badge.tsx",
            "export default memo(({ count }) => <span>{count}</span>);",
        );
        assert_eq!(declared(&memo_default), vec![decl("Badge", &["count"])]);

        let anonymous_class = extract(
            "src/Modal.tsx",
            "export default class extends React.Component { render() { return null; } }",
        );
        assert_eq!(declared(&anonymous_class), vec![decl("Modal", &[])]);
    }

    #[test]
    fn test_ignored_default_exports() {
        let value = extract("src/config.ts", "export default { retries: 3 };");
        assert_eq!(declared(&value), vec![]);

        let lowercase = extract(
            "src/useThing.tsx",
            "export default function useThing() { return 1; }",
        );
        assert_eq!(declared(&lowercase), vec![]);

        // the binding was already declared; the re-export adds nothing
        let reexport = extract(
            "src/Nav.tsx",
            "const Nav = () => <nav />;\nexport default Nav;",
        );
        assert_eq!(declared(&reexport), vec![decl("Nav", &[])]);
    }

    #[test]
    fn test_usages_are_ordered_and_unique() {
        let extraction = extract(
            "src/App.tsx",
            r#"
            export const App = () => (
                <Layout>
                    <Header />
                    <div>
                        <Body />
                        <Header title="again" />
                    </div>
                    <ui.Button />
                    {items.map((item) => <Row key={item.id} />)}
                </Layout>
            );
            "#,
        );
        assert_eq!(
            extraction.used_components,
            vec!["Layout", "Header", "Body", "Row"]
        );
    }

    #[test]
    fn test_routes() {
        let extraction = extract(
            "src/Nav.tsx",
            r#"
            export function Nav() {
                return (
                    <Routes>
                        <Route path="/x" component={Page} />
                        <Route path={"/y"} element={<Other />} />
                        <Route path={`/users/${id}`} Component={UserPage} />
                        <Route path={dynamicPath} element={<Fallback />} />
                    </Routes>
                );
            }
            "#,
        );
        assert_eq!(
            extraction.routes,
            vec![
                RouteDeclaration::new("/x", "Page"),
                RouteDeclaration::new("/y", "Other"),
                RouteDeclaration::new("dynamic", "UserPage"),
                RouteDeclaration::new("dynamic", "Fallback"),
            ]
        );
        // the routing element itself and markup targets are usages too
        assert_eq!(
            extraction.used_components,
            vec!["Routes", "Route", "Other", "Fallback"]
        );
        assert!(extraction.diagnostics.is_empty());
    }

    #[test]
    fn test_incomplete_routes_are_reported() {
        let extraction = extract(
            "src/Nav.tsx",
            "export const Nav = () => (\n  <div>\n    <Route path=\"/x\" />\n  </div>\n);\n",
        );
        assert_eq!(extraction.routes, vec![]);
        assert_eq!(
            extraction.diagnostics,
            vec!["WARN: src/Nav.tsx:3:4 :: ignoring <Route> without a target component".to_string()]
        );
    }

    #[test]
    fn test_root_render_is_detected() {
        let entry = extract(
            "src/index.jsx",
            "ReactDOM.createRoot(document.getElementById('root')).render(<App />);",
        );
        assert!(entry.renders_root);
        assert_eq!(entry.used_components, vec!["App"]);

        let component = extract("src/App.jsx", "export const App = () => <div />;");
        assert!(!component.renders_root);
    }

    #[test]
    fn test_parse_failure_is_an_error() {
        let result = extract_file(
            Path::new("src/Broken.tsx"),
            "export const = <div>;",
            &ComponentTreeConfig::default(),
        );
        assert!(result.is_err());
    }
}
