//! Language-neutral declaration model and its lowering from `syn` items.
//!
//! The directive extractor and the document assembler never look at `syn` types. They
//! work on [`Declaration`] values, which carry only what the directives need: names, doc
//! comments, field lists with their serialization tags, and literal values.

use log::debug;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{Expr, GenericArgument, Lit, Meta, MetaNameValue, PathArguments, Token};

/// A top-level declaration of a source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// A struct or type alias
    Type(TypeDecl),
    /// A `const` or `static` item
    Value(ValueDecl),
    /// A free function
    Function(FunctionDecl),
}

/// A type declaration and its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub doc: Option<String>,
    pub body: TypeBody,
}

/// The shape of a type declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeBody {
    /// Named fields of a struct (empty for unit structs)
    Fields(Vec<Field>),
    /// Element type of an alias over a sequence
    Elements(TypeRef),
    /// Target of any other alias, or the wrapped type of a newtype struct
    Alias(TypeRef),
}

/// A struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
    pub tag: Option<FieldTag>,
}

/// Serialization override attached to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTag {
    Rename(String),
    /// The field is never serialized
    Omit,
}

/// A `const` or `static` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDecl {
    pub names: Vec<String>,
    pub doc: Option<String>,
    pub values: Vec<Literal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub doc: Option<String>,
}

/// The value bound by a [`ValueDecl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// A string literal, already unquoted
    Str(String),
    /// Anything else, described by its source spelling
    Other(String),
}

/// A reference to a type as written in a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A single-segment name such as `i64` or `User`
    Named(String),
    /// A path such as `chrono::DateTime`, spelled `package.name`
    Qualified { package: String, name: String },
    Sequence(Box<TypeRef>),
    Map {
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
    /// An indirection (`Box`, `Option`, `&T`, ...) over the inner type
    Pointer(Box<TypeRef>),
    /// A type with no schema counterpart (tuples, function pointers, ...)
    Unsupported(String),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Type(decl) => &decl.name,
            Declaration::Value(decl) => decl.names.first().map(String::as_str).unwrap_or(""),
            Declaration::Function(decl) => &decl.name,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            Declaration::Type(decl) => decl.doc.as_deref(),
            Declaration::Value(decl) => decl.doc.as_deref(),
            Declaration::Function(decl) => decl.doc.as_deref(),
        }
    }
}

impl TypeRef {
    /// Converts a `syn` type into a type reference.
    pub fn from_syn(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Path(type_path) if type_path.qself.is_none() => {
                Self::from_path(&type_path.path)
            }
            syn::Type::Reference(reference) => {
                TypeRef::Pointer(Box::new(Self::from_syn(&reference.elem)))
            }
            syn::Type::Ptr(ptr) => TypeRef::Pointer(Box::new(Self::from_syn(&ptr.elem))),
            syn::Type::Slice(slice) => TypeRef::Sequence(Box::new(Self::from_syn(&slice.elem))),
            syn::Type::Array(array) => TypeRef::Sequence(Box::new(Self::from_syn(&array.elem))),
            syn::Type::Paren(paren) => Self::from_syn(&paren.elem),
            syn::Type::Group(group) => Self::from_syn(&group.elem),
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => {
                TypeRef::Unsupported("()".to_string())
            }
            syn::Type::Tuple(_) => TypeRef::Unsupported("tuple".to_string()),
            syn::Type::BareFn(_) => TypeRef::Unsupported("fn pointer".to_string()),
            syn::Type::TraitObject(_) => TypeRef::Unsupported("trait object".to_string()),
            syn::Type::ImplTrait(_) => TypeRef::Unsupported("impl trait".to_string()),
            _ => TypeRef::Unsupported("unknown".to_string()),
        }
    }

    fn from_path(path: &syn::Path) -> Self {
        let Some(last) = path.segments.last() else {
            return TypeRef::Unsupported("empty path".to_string());
        };
        let name = last.ident.unraw().to_string();

        let type_args: Vec<&syn::Type> = match &last.arguments {
            PathArguments::AngleBracketed(args) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(ty) => Some(ty),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        match (name.as_str(), type_args.as_slice()) {
            ("Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet", [elem]) => {
                TypeRef::Sequence(Box::new(Self::from_syn(elem)))
            }
            ("HashMap" | "BTreeMap" | "IndexMap", [key, value]) => TypeRef::Map {
                key: Box::new(Self::from_syn(key)),
                value: Box::new(Self::from_syn(value)),
            },
            ("Box" | "Option" | "Rc" | "Arc" | "Cow", [inner]) => {
                TypeRef::Pointer(Box::new(Self::from_syn(inner)))
            }
            _ if path.segments.len() > 1 => {
                let package = path.segments[path.segments.len() - 2].ident.unraw().to_string();
                TypeRef::Qualified { package, name }
            }
            _ => TypeRef::Named(name),
        }
    }

    /// Strips any number of pointer layers.
    pub fn pointee(&self) -> &TypeRef {
        match self {
            TypeRef::Pointer(inner) => inner.pointee(),
            other => other,
        }
    }
}

impl Literal {
    fn from_expr(expr: &Expr) -> Self {
        match expr {
            Expr::Lit(expr_lit) => match &expr_lit.lit {
                Lit::Str(s) => Literal::Str(s.value()),
                Lit::Int(i) => Literal::Other(i.base10_digits().to_string()),
                Lit::Float(f) => Literal::Other(f.base10_digits().to_string()),
                Lit::Bool(b) => Literal::Other(b.value.to_string()),
                Lit::Char(c) => Literal::Other(format!("{:?}", c.value())),
                _ => Literal::Other("literal".to_string()),
            },
            Expr::Group(group) => Self::from_expr(&group.expr),
            Expr::Paren(paren) => Self::from_expr(&paren.expr),
            _ => Literal::Other("expression".to_string()),
        }
    }
}

/// Lowers the items of a parsed file into declarations, in source order.
///
/// Inline `mod` blocks are walked recursively. Methods of `impl` blocks and default
/// methods of traits lower to functions. Items that cannot carry a directive (enums,
/// `use` items, ...) are dropped.
pub fn lower_items(items: &[syn::Item]) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    collect_items(items, &mut declarations);
    declarations
}

fn collect_items(items: &[syn::Item], declarations: &mut Vec<Declaration>) {
    for item in items {
        match item {
            syn::Item::Struct(item_struct) => {
                if let Some(decl) = lower_struct(item_struct) {
                    declarations.push(Declaration::Type(decl));
                }
            }
            syn::Item::Type(item_type) => {
                declarations.push(Declaration::Type(lower_type_alias(item_type)));
            }
            syn::Item::Const(item_const) => declarations.push(Declaration::Value(ValueDecl {
                names: vec![item_const.ident.unraw().to_string()],
                doc: doc_comment(&item_const.attrs),
                values: vec![Literal::from_expr(&item_const.expr)],
            })),
            syn::Item::Static(item_static) => declarations.push(Declaration::Value(ValueDecl {
                names: vec![item_static.ident.unraw().to_string()],
                doc: doc_comment(&item_static.attrs),
                values: vec![Literal::from_expr(&item_static.expr)],
            })),
            syn::Item::Fn(item_fn) => declarations.push(Declaration::Function(FunctionDecl {
                name: item_fn.sig.ident.unraw().to_string(),
                doc: doc_comment(&item_fn.attrs),
            })),
            syn::Item::Impl(item_impl) => {
                for impl_item in &item_impl.items {
                    if let syn::ImplItem::Fn(method) = impl_item {
                        declarations.push(Declaration::Function(FunctionDecl {
                            name: method.sig.ident.unraw().to_string(),
                            doc: doc_comment(&method.attrs),
                        }));
                    }
                }
            }
            syn::Item::Trait(item_trait) => {
                for trait_item in &item_trait.items {
                    match trait_item {
                        syn::TraitItem::Fn(method) if method.default.is_some() => {
                            declarations.push(Declaration::Function(FunctionDecl {
                                name: method.sig.ident.unraw().to_string(),
                                doc: doc_comment(&method.attrs),
                            }));
                        }
                        _ => {}
                    }
                }
            }
            syn::Item::Mod(item_mod) => {
                if let Some((_, content)) = &item_mod.content {
                    collect_items(content, declarations);
                }
            }
            _ => {}
        }
    }
}

fn lower_struct(item_struct: &syn::ItemStruct) -> Option<TypeDecl> {
    let name = item_struct.ident.unraw().to_string();
    let rule = rename_rule(&item_struct.attrs);

    let body = match &item_struct.fields {
        syn::Fields::Named(named) => TypeBody::Fields(
            named
                .named
                .iter()
                .filter_map(|field| lower_field(field, rule))
                .collect(),
        ),
        syn::Fields::Unit => TypeBody::Fields(Vec::new()),
        syn::Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
            TypeBody::Alias(TypeRef::from_syn(&unnamed.unnamed[0].ty))
        }
        syn::Fields::Unnamed(_) => {
            debug!("Skipping tuple struct {}", name);
            return None;
        }
    };

    Some(TypeDecl {
        name,
        doc: doc_comment(&item_struct.attrs),
        body,
    })
}

fn lower_type_alias(item_type: &syn::ItemType) -> TypeDecl {
    let body = match TypeRef::from_syn(&item_type.ty) {
        TypeRef::Sequence(elem) => TypeBody::Elements(*elem),
        other => TypeBody::Alias(other),
    };
    TypeDecl {
        name: item_type.ident.unraw().to_string(),
        doc: doc_comment(&item_type.attrs),
        body,
    }
}

fn lower_field(field: &syn::Field, rule: Option<RenameRule>) -> Option<Field> {
    let name = field.ident.as_ref()?.unraw().to_string();
    let tag = field_tag(&field.attrs, rule, &name);
    Some(Field {
        ty: TypeRef::from_syn(&field.ty),
        name,
        tag,
    })
}

/// Collects the `#[doc]` attributes of an item into one dedented text.
fn doc_comment(attrs: &[syn::Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(name_value) => string_value(&name_value.value),
            _ => None,
        })
        .collect();

    if lines.is_empty() {
        return None;
    }
    Some(dedent(&lines.join("\n")))
}

/// Removes the indentation shared by all non-blank lines.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.get(indent..).unwrap_or_else(|| line.trim_start())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn string_value(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(s) => Some(s.value()),
            _ => None,
        },
        _ => None,
    }
}

/// All comma-separated entries of the `#[serde(...)]` attributes.
fn serde_metas(attrs: &[syn::Attribute]) -> Vec<Meta> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .filter_map(|attr| {
            match attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) {
                Ok(metas) => Some(metas),
                Err(e) => {
                    debug!("Ignoring unparsable serde attribute: {}", e);
                    None
                }
            }
        })
        .flatten()
        .collect()
}

fn field_tag(attrs: &[syn::Attribute], rule: Option<RenameRule>, name: &str) -> Option<FieldTag> {
    let mut tag = None;

    for meta in serde_metas(attrs) {
        match &meta {
            Meta::Path(path) if path.is_ident("skip") || path.is_ident("skip_serializing") => {
                return Some(FieldTag::Omit);
            }
            Meta::NameValue(name_value) if name_value.path.is_ident("rename") => {
                if let Some(value) = string_value(&name_value.value) {
                    tag = Some(FieldTag::Rename(value));
                }
            }
            // #[serde(rename(serialize = "..."))]
            Meta::List(list) if list.path.is_ident("rename") => {
                let nested = list
                    .parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated);
                if let Ok(nested) = nested {
                    let serialized = nested
                        .iter()
                        .find(|nv| nv.path.is_ident("serialize"))
                        .and_then(|nv| string_value(&nv.value));
                    if let Some(value) = serialized {
                        tag = Some(FieldTag::Rename(value));
                    }
                }
            }
            _ => {}
        }
    }

    tag.or_else(|| rule.map(|rule| FieldTag::Rename(rule.apply(name))))
}

fn rename_rule(attrs: &[syn::Attribute]) -> Option<RenameRule> {
    serde_metas(attrs).iter().find_map(|meta| match meta {
        Meta::NameValue(name_value) if name_value.path.is_ident("rename_all") => {
            string_value(&name_value.value).and_then(|value| RenameRule::parse(&value))
        }
        _ => None,
    })
}

/// Container-level `rename_all` rule, applied to snake_case field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "lowercase" => Some(RenameRule::Lower),
            "UPPERCASE" => Some(RenameRule::Upper),
            "PascalCase" => Some(RenameRule::Pascal),
            "camelCase" => Some(RenameRule::Camel),
            "snake_case" => Some(RenameRule::Snake),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnake),
            "kebab-case" => Some(RenameRule::Kebab),
            "SCREAMING-KEBAB-CASE" => Some(RenameRule::ScreamingKebab),
            other => {
                debug!("Unknown rename_all rule: {}", other);
                None
            }
        }
    }

    fn apply(self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => {
                let mut pascal = String::with_capacity(field.len());
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            RenameRule::Camel => {
                let pascal = RenameRule::Pascal.apply(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => RenameRule::ScreamingSnake.apply(field).replace('_', "-"),
        }
    }
}
