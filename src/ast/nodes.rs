use super::Span;
use std::fmt;

// Package and import declarations

#[derive(Debug, Clone, PartialEq)]
pub struct PackageDeclaration {
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub documentation: Option<String>,
    pub span: Span,
}

impl fmt::Display for PackageDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "package {};", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// Dot-separated import path, without the trailing `.*`
    pub path: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub span: Span,
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "import static ")?;
        } else {
            write!(f, "import ")?;
        }
        if self.is_wildcard {
            write!(f, "{}.*;", self.path)
        } else {
            write!(f, "{};", self.path)
        }
    }
}

// Type declarations

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDeclaration {
    Class(ClassDeclaration),
    Interface(InterfaceDeclaration),
    Enum(EnumDeclaration),
    Annotation(AnnotationDeclaration),
}

impl TypeDeclaration {
    pub fn name(&self) -> &str {
        match self {
            TypeDeclaration::Class(c) => &c.name,
            TypeDeclaration::Interface(i) => &i.name,
            TypeDeclaration::Enum(e) => &e.name,
            TypeDeclaration::Annotation(a) => &a.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TypeDeclaration::Class(c) => c.span,
            TypeDeclaration::Interface(i) => i.span,
            TypeDeclaration::Enum(e) => e.span,
            TypeDeclaration::Annotation(a) => a.span,
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        match self {
            TypeDeclaration::Class(c) => &c.annotations,
            TypeDeclaration::Interface(i) => &i.annotations,
            TypeDeclaration::Enum(e) => &e.annotations,
            TypeDeclaration::Annotation(a) => &a.annotations,
        }
    }
}

impl fmt::Display for TypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDeclaration::Class(c) => write!(f, "class {}", c.name),
            TypeDeclaration::Interface(i) => write!(f, "interface {}", i.name),
            TypeDeclaration::Enum(e) => write!(f, "enum {}", e.name),
            TypeDeclaration::Annotation(a) => write!(f, "@interface {}", a.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub documentation: Option<String>,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub extends: Option<ReferenceType>,
    pub implements: Vec<ReferenceType>,
    pub body: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub documentation: Option<String>,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub extends: Vec<ReferenceType>,
    pub body: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDeclaration {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub documentation: Option<String>,
    pub name: String,
    pub implements: Vec<ReferenceType>,
    pub constants: Vec<EnumConstant>,
    pub body: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub annotations: Vec<Annotation>,
    pub documentation: Option<String>,
    pub name: String,
    pub arguments: Vec<Expr>,
    pub body: Option<Vec<Member>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDeclaration {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub documentation: Option<String>,
    pub name: String,
    pub body: Vec<Member>,
    pub span: Span,
}

// Modifiers and annotations

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    // Java 8: default interface method
    Default,
}

impl Modifier {
    /// Map a modifier keyword to its variant
    pub fn from_keyword(keyword: &str) -> Option<Modifier> {
        match keyword {
            "public" => Some(Modifier::Public),
            "protected" => Some(Modifier::Protected),
            "private" => Some(Modifier::Private),
            "abstract" => Some(Modifier::Abstract),
            "static" => Some(Modifier::Static),
            "final" => Some(Modifier::Final),
            "native" => Some(Modifier::Native),
            "synchronized" => Some(Modifier::Synchronized),
            "transient" => Some(Modifier::Transient),
            "volatile" => Some(Modifier::Volatile),
            "strictfp" => Some(Modifier::Strictfp),
            "default" => Some(Modifier::Default),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Native => "native",
            Modifier::Synchronized => "synchronized",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Strictfp => "strictfp",
            Modifier::Default => "default",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Qualified annotation type name, without the leading `@`
    pub name: String,
    pub element: Option<AnnotationElement>,
    pub span: Span,
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationElement {
    /// Single value form: `@Foo(value)`
    Value(ElementValue),
    /// Named pair form: `@Foo(a = 1, b = 2)`
    Pairs(Vec<ElementValuePair>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementValuePair {
    pub name: String,
    pub value: ElementValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Annotation(Box<Annotation>),
    Array(Vec<ElementValue>),
    Expression(Expr),
}

// Type references

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Basic(BasicType),
    Reference(ReferenceType),
}

impl Type {
    pub fn dimensions(&self) -> &[Span] {
        match self {
            Type::Basic(b) => &b.dimensions,
            Type::Reference(r) => &r.dimensions,
        }
    }

    pub(crate) fn dimensions_mut(&mut self) -> &mut Vec<Span> {
        match self {
            Type::Basic(b) => &mut b.dimensions,
            Type::Reference(r) => &mut r.dimensions,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Type::Basic(b) => &b.name,
            Type::Reference(r) => &r.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Type::Basic(b) => b.span,
            Type::Reference(r) => r.span,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(b) => write!(f, "{}", b),
            Type::Reference(r) => write!(f, "{}", r),
        }
    }
}

/// Primitive type reference (`int`, `boolean`, ...)
///
/// Dimensions hold one entry per `[]` pair; pairs written after a method's
/// parameter list are appended behind pairs written before the name.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicType {
    pub name: String,
    pub dimensions: Vec<Span>,
    pub span: Span,
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for _ in &self.dimensions {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Class or interface type reference
///
/// `sub_type` chains one link per `.`-separated qualifier, so each segment of
/// `Outer.Inner<T>` keeps its own type arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceType {
    pub name: String,
    pub type_arguments: Vec<TypeArgument>,
    pub sub_type: Option<Box<ReferenceType>>,
    pub dimensions: Vec<Span>,
    pub span: Span,
}

impl ReferenceType {
    /// Length of the qualifier chain rooted at this segment
    pub fn chain_len(&self) -> usize {
        1 + self.sub_type.as_deref().map_or(0, ReferenceType::chain_len)
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.type_arguments.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        if let Some(ref sub) = self.sub_type {
            write!(f, ".{}", sub)?;
        }
        for _ in &self.dimensions {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeArgument {
    Type(Type),
    Wildcard(Wildcard),
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Type(t) => write!(f, "{}", t),
            TypeArgument::Wildcard(w) => match &w.bound {
                None => write!(f, "?"),
                Some((BoundKind::Extends, t)) => write!(f, "? extends {}", t),
                Some((BoundKind::Super, t)) => write!(f, "? super {}", t),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wildcard {
    pub bound: Option<(BoundKind, Type)>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub name: String,
    pub bounds: Vec<ReferenceType>,
    pub span: Span,
}

// Class, interface, enum and annotation-type members

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDeclaration),
    Method(MethodDeclaration),
    Constructor(ConstructorDeclaration),
    Type(TypeDeclaration),
    Initializer(InitializerBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub documentation: Option<String>,
    pub ty: Type,
    pub declarators: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: String,
    pub dimensions: Vec<Span>,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub documentation: Option<String>,
    pub type_parameters: Vec<TypeParameter>,
    /// `None` for `void` methods
    pub return_type: Option<Type>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<ReferenceType>,
    /// `None` for abstract and annotation-type methods
    pub body: Option<Block>,
    /// Annotation-type member default: `int value() default 3;`
    pub default_value: Option<ElementValue>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDeclaration {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub documentation: Option<String>,
    pub type_parameters: Vec<TypeParameter>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<ReferenceType>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub ty: Type,
    pub name: String,
    pub varargs: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitializerBlock {
    pub is_static: bool,
    pub block: Block,
    pub span: Span,
}

/// Opaque brace-balanced region; statement grammar is not parsed here
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub span: Span,
}

// Expressions
//
// Binary operations are the only structured expression shape; every other
// expression form is carried as an opaque operand.

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryExpr),
    Operand(OperandExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Binary(b) => b.span,
            Expr::Operand(o) => o.span,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary(b) => write!(f, "({} {} {})", b.left, b.operator, b.right),
            Expr::Operand(o) => f.write_str(&o.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub operator: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperandExpr {
    /// Source text of the operand, tokens joined with single spaces
    pub text: String,
    pub span: Span,
}
