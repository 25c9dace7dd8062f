//! Recursive descent parser for Java declarations
//!
//! One method per grammar production, all built on three token-consuming
//! primitives (`accept`, `would_accept`, `try_accept`) over the lookahead
//! cursor. A production that cannot match raises a syntax error that
//! propagates untouched to the top-level caller; markers absorb only
//! non-matches detected through the boolean helpers, never raised errors.

use super::cursor::TokenCursor;
use super::error::{ParseError, ParseResult};
use super::precedence::{build_binary_operation, is_binary_operator, ExprPart};
use super::token::{Token, TokenKind};
use crate::ast::*;
use crate::config::Config;

/// One expectation for the `accept` family: a literal token value or a kind
#[derive(Debug, Clone, Copy)]
pub enum Expectation {
    Value(&'static str),
    Kind(TokenKind),
}

impl Expectation {
    fn matches(&self, token: &Token) -> bool {
        match self {
            Expectation::Value(value) => token.value == *value,
            Expectation::Kind(kind) => token.kind == *kind,
        }
    }

    fn describe(&self) -> String {
        match self {
            Expectation::Value(value) => format!("'{}'", value),
            Expectation::Kind(kind) => kind.to_string(),
        }
    }
}

impl From<&'static str> for Expectation {
    fn from(value: &'static str) -> Self {
        Expectation::Value(value)
    }
}

impl From<TokenKind> for Expectation {
    fn from(kind: TokenKind) -> Self {
        Expectation::Kind(kind)
    }
}

macro_rules! expect {
    ($($e:expr),+ $(,)?) => {
        &[$(Expectation::from($e)),+][..]
    };
}

/// Parser over a classified token stream
pub struct Parser {
    cursor: TokenCursor,
    config: Config,
    depth: usize,
    last_location: Location,
    /// Closes still owed after splitting a `>>` or `>>>` token while ending
    /// nested type argument or type parameter lists
    pending_closes: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, config: Config) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            config,
            depth: 0,
            last_location: Location::start(),
            pending_closes: 0,
        }
    }

    // Token-consuming primitives

    /// Consume one token per expectation, returning the last consumed value
    pub fn accept(&mut self, expected: &[Expectation]) -> ParseResult<String> {
        if expected.is_empty() {
            return Err(ParseError::internal("accept called with no expectations"));
        }
        let mut last = String::new();
        for expectation in expected {
            if !expectation.matches(self.cursor.peek(0)) {
                return Err(self.mismatch(expectation.describe()));
            }
            last = self.bump().value;
        }
        Ok(last)
    }

    /// Check a fixed-length window against the expectations without consuming
    pub fn would_accept(&self, expected: &[Expectation]) -> bool {
        !expected.is_empty()
            && expected
                .iter()
                .enumerate()
                .all(|(offset, expectation)| expectation.matches(self.cursor.peek(offset)))
    }

    /// Consume the whole window only if every expectation matches
    pub fn try_accept(&mut self, expected: &[Expectation]) -> bool {
        if self.would_accept(expected) {
            for _ in expected {
                self.bump();
            }
            true
        } else {
            false
        }
    }

    fn bump(&mut self) -> Token {
        let token = self.cursor.next();
        if !token.is_end() {
            self.last_location = token.location;
        }
        token
    }

    fn mismatch(&self, expected: String) -> ParseError {
        let token = self.cursor.peek(0);
        if token.is_end() {
            ParseError::unexpected_end_of_input(expected, token.location)
        } else {
            ParseError::unexpected_token(expected, token.describe(), token.location)
        }
    }

    /// Syntax error at the current token
    fn illegal(&self, description: &str) -> ParseError {
        self.mismatch(description.to_string())
    }

    fn here(&self) -> Location {
        self.cursor.peek(0).location
    }

    fn span_from(&self, start: Location) -> Span {
        Span::new(start, self.last_location)
    }

    fn documentation(&self) -> Option<String> {
        self.cursor.peek(0).javadoc.clone()
    }

    /// Run a production with optional trace output
    ///
    /// Trace lines are observational only; the parse result is identical
    /// with tracing on or off.
    fn traced<T>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if !self.config.trace {
            return f(self);
        }
        eprintln!(
            "{:02} {}> {} ({})",
            self.depth,
            "-".repeat(self.depth),
            name,
            self.cursor.peek(0)
        );
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        match &result {
            Ok(_) => eprintln!("{:02} <{} {}", self.depth, "-".repeat(self.depth), name),
            Err(e) => eprintln!(
                "{:02} <{} {} raised: {}",
                self.depth,
                "-".repeat(self.depth),
                name,
                e
            ),
        }
        result
    }

    // Compilation unit

    pub fn parse_compilation_unit(&mut self) -> ParseResult<CompilationUnit> {
        self.traced("compilation_unit", |p| {
            let start = p.here();
            let documentation = p.documentation();
            let mut package = None;

            // Leading annotations may belong to either a package declaration
            // or the first type declaration. Parse them speculatively; if no
            // `package` keyword follows, rewind so the type declaration
            // re-consumes the same tokens.
            p.cursor.push_marker();
            let mut package_annotations = Vec::new();
            while p.would_accept(expect![TokenKind::Annotation]) && !p.is_annotation_declaration() {
                package_annotations.push(p.parse_annotation()?);
            }
            if p.would_accept(expect!["package"]) {
                p.cursor.pop_marker(false);
                p.accept(expect!["package"])?;
                let name = p.parse_qualified_name()?;
                p.accept(expect![";"])?;
                package = Some(PackageDeclaration {
                    annotations: package_annotations,
                    name,
                    documentation,
                    span: p.span_from(start),
                });
            } else {
                p.cursor.pop_marker(true);
            }

            let mut imports = Vec::new();
            while p.would_accept(expect!["import"]) {
                imports.push(p.parse_import()?);
            }

            let mut types = Vec::new();
            while !p.cursor.peek(0).is_end() {
                // Stray semicolons are empty declarations, dropped silently
                if p.try_accept(expect![";"]) {
                    continue;
                }
                types.push(p.parse_type_declaration()?);
            }

            Ok(CompilationUnit {
                package,
                imports,
                types,
                span: p.span_from(start),
            })
        })
    }

    fn parse_import(&mut self) -> ParseResult<Import> {
        self.traced("import", |p| {
            let start = p.here();
            p.accept(expect!["import"])?;
            let is_static = p.try_accept(expect!["static"]);
            let mut parts = vec![p.accept(expect![TokenKind::Identifier])?];
            let mut is_wildcard = false;
            while p.try_accept(expect!["."]) {
                if p.try_accept(expect!["*"]) {
                    is_wildcard = true;
                    break;
                }
                parts.push(p.accept(expect![TokenKind::Identifier])?);
            }
            p.accept(expect![";"])?;
            Ok(Import {
                path: parts.join("."),
                is_static,
                is_wildcard,
                span: p.span_from(start),
            })
        })
    }

    fn parse_qualified_name(&mut self) -> ParseResult<String> {
        let mut parts = vec![self.accept(expect![TokenKind::Identifier])?];
        while self.would_accept(expect![".", TokenKind::Identifier]) {
            self.accept(expect!["."])?;
            parts.push(self.accept(expect![TokenKind::Identifier])?);
        }
        Ok(parts.join("."))
    }

    // Type declarations

    /// An `@` here opens an annotation-type declaration, not an annotation
    /// application, exactly when the next token is the literal `interface`
    fn is_annotation_declaration(&self) -> bool {
        self.would_accept(expect![TokenKind::Annotation, "interface"])
    }

    pub fn parse_type_declaration(&mut self) -> ParseResult<TypeDeclaration> {
        self.traced("type_declaration", |p| {
            let documentation = p.documentation();
            let start = p.here();
            let (modifiers, annotations) = p.parse_modifiers_and_annotations()?;
            p.parse_type_declaration_rest(start, modifiers, annotations, documentation)
        })
    }

    fn parse_type_declaration_rest(
        &mut self,
        start: Location,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
        documentation: Option<String>,
    ) -> ParseResult<TypeDeclaration> {
        if self.would_accept(expect!["class"]) {
            self.parse_class_declaration(start, modifiers, annotations, documentation)
                .map(TypeDeclaration::Class)
        } else if self.would_accept(expect!["enum"]) {
            self.parse_enum_declaration(start, modifiers, annotations, documentation)
                .map(TypeDeclaration::Enum)
        } else if self.would_accept(expect!["interface"]) {
            self.parse_interface_declaration(start, modifiers, annotations, documentation)
                .map(TypeDeclaration::Interface)
        } else if self.is_annotation_declaration() {
            self.parse_annotation_type_declaration(start, modifiers, annotations, documentation)
                .map(TypeDeclaration::Annotation)
        } else {
            Err(self.illegal("type declaration"))
        }
    }

    fn parse_modifiers_and_annotations(
        &mut self,
    ) -> ParseResult<(Vec<Modifier>, Vec<Annotation>)> {
        let mut modifiers = Vec::new();
        let mut annotations = Vec::new();
        loop {
            match self.cursor.peek(0).kind {
                TokenKind::Modifier => {
                    let value = self.cursor.peek(0).value.clone();
                    match Modifier::from_keyword(&value) {
                        Some(modifier) => {
                            self.bump();
                            if !modifiers.contains(&modifier) {
                                modifiers.push(modifier);
                            }
                        }
                        None => return Err(self.illegal("modifier keyword")),
                    }
                }
                TokenKind::Annotation if !self.is_annotation_declaration() => {
                    annotations.push(self.parse_annotation()?);
                }
                _ => break,
            }
        }
        Ok((modifiers, annotations))
    }

    fn parse_class_declaration(
        &mut self,
        start: Location,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
        documentation: Option<String>,
    ) -> ParseResult<ClassDeclaration> {
        self.traced("class_declaration", |p| {
            p.accept(expect!["class"])?;
            let name = p.accept(expect![TokenKind::Identifier])?;
            let type_parameters = if p.would_accept(expect!["<"]) {
                p.parse_type_parameters()?
            } else {
                Vec::new()
            };
            let extends = if p.try_accept(expect!["extends"]) {
                Some(p.parse_reference_type()?)
            } else {
                None
            };
            let implements = if p.try_accept(expect!["implements"]) {
                p.parse_reference_type_list()?
            } else {
                Vec::new()
            };
            let body = p.parse_body()?;
            Ok(ClassDeclaration {
                modifiers,
                annotations,
                documentation,
                name,
                type_parameters,
                extends,
                implements,
                body,
                span: p.span_from(start),
            })
        })
    }

    fn parse_interface_declaration(
        &mut self,
        start: Location,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
        documentation: Option<String>,
    ) -> ParseResult<InterfaceDeclaration> {
        self.traced("interface_declaration", |p| {
            p.accept(expect!["interface"])?;
            let name = p.accept(expect![TokenKind::Identifier])?;
            let type_parameters = if p.would_accept(expect!["<"]) {
                p.parse_type_parameters()?
            } else {
                Vec::new()
            };
            let extends = if p.try_accept(expect!["extends"]) {
                p.parse_reference_type_list()?
            } else {
                Vec::new()
            };
            let body = p.parse_body()?;
            Ok(InterfaceDeclaration {
                modifiers,
                annotations,
                documentation,
                name,
                type_parameters,
                extends,
                body,
                span: p.span_from(start),
            })
        })
    }

    fn parse_enum_declaration(
        &mut self,
        start: Location,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
        documentation: Option<String>,
    ) -> ParseResult<EnumDeclaration> {
        self.traced("enum_declaration", |p| {
            p.accept(expect!["enum"])?;
            let name = p.accept(expect![TokenKind::Identifier])?;
            let implements = if p.try_accept(expect!["implements"]) {
                p.parse_reference_type_list()?
            } else {
                Vec::new()
            };
            p.accept(expect!["{"])?;

            let mut constants = Vec::new();
            if !p.would_accept(expect![";"]) && !p.would_accept(expect!["}"]) {
                loop {
                    constants.push(p.parse_enum_constant()?);
                    if !p.try_accept(expect![","]) {
                        break;
                    }
                    // trailing comma before the body separator or close
                    if p.would_accept(expect![";"]) || p.would_accept(expect!["}"]) {
                        break;
                    }
                }
            }

            let mut body = Vec::new();
            if p.try_accept(expect![";"]) {
                while !p.would_accept(expect!["}"]) && !p.cursor.peek(0).is_end() {
                    if p.try_accept(expect![";"]) {
                        continue;
                    }
                    body.push(p.parse_member()?);
                }
            }
            p.accept(expect!["}"])?;

            Ok(EnumDeclaration {
                modifiers,
                annotations,
                documentation,
                name,
                implements,
                constants,
                body,
                span: p.span_from(start),
            })
        })
    }

    fn parse_enum_constant(&mut self) -> ParseResult<EnumConstant> {
        let documentation = self.documentation();
        let start = self.here();
        let mut annotations = Vec::new();
        while self.would_accept(expect![TokenKind::Annotation]) {
            annotations.push(self.parse_annotation()?);
        }
        let name = self.accept(expect![TokenKind::Identifier])?;
        let arguments = if self.would_accept(expect!["("]) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        let body = if self.would_accept(expect!["{"]) {
            Some(self.parse_body()?)
        } else {
            None
        };
        Ok(EnumConstant {
            annotations,
            documentation,
            name,
            arguments,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_annotation_type_declaration(
        &mut self,
        start: Location,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
        documentation: Option<String>,
    ) -> ParseResult<AnnotationDeclaration> {
        self.traced("annotation_type_declaration", |p| {
            p.accept(expect![TokenKind::Annotation, "interface"])?;
            let name = p.accept(expect![TokenKind::Identifier])?;
            let body = p.parse_body()?;
            Ok(AnnotationDeclaration {
                modifiers,
                annotations,
                documentation,
                name,
                body,
                span: p.span_from(start),
            })
        })
    }

    // Members

    fn parse_body(&mut self) -> ParseResult<Vec<Member>> {
        self.accept(expect!["{"])?;
        let mut members = Vec::new();
        while !self.would_accept(expect!["}"]) {
            if self.cursor.peek(0).is_end() {
                break;
            }
            // stray `;` contributes no member
            if self.try_accept(expect![";"]) {
                continue;
            }
            members.push(self.parse_member()?);
        }
        self.accept(expect!["}"])?;
        Ok(members)
    }

    fn parse_member(&mut self) -> ParseResult<Member> {
        self.traced("member", |p| {
            let documentation = p.documentation();
            let start = p.here();
            let (modifiers, annotations) = p.parse_modifiers_and_annotations()?;

            if p.would_accept(expect!["class"])
                || p.would_accept(expect!["enum"])
                || p.would_accept(expect!["interface"])
                || p.is_annotation_declaration()
            {
                return p
                    .parse_type_declaration_rest(start, modifiers, annotations, documentation)
                    .map(Member::Type);
            }

            if p.would_accept(expect!["{"]) {
                let block = p.parse_block()?;
                return Ok(Member::Initializer(InitializerBlock {
                    is_static: modifiers.contains(&Modifier::Static),
                    block,
                    span: p.span_from(start),
                }));
            }

            if p.try_accept(expect!["void"]) {
                let name = p.accept(expect![TokenKind::Identifier])?;
                return p.parse_method_rest(
                    start,
                    modifiers,
                    annotations,
                    documentation,
                    Vec::new(),
                    None,
                    name,
                );
            }

            if p.would_accept(expect!["<"]) {
                let type_parameters = p.parse_type_parameters()?;
                if p.try_accept(expect!["void"]) {
                    let name = p.accept(expect![TokenKind::Identifier])?;
                    return p.parse_method_rest(
                        start,
                        modifiers,
                        annotations,
                        documentation,
                        type_parameters,
                        None,
                        name,
                    );
                }
                if p.would_accept(expect![TokenKind::Identifier, "("]) {
                    return p
                        .parse_constructor_rest(
                            start,
                            modifiers,
                            annotations,
                            documentation,
                            type_parameters,
                        )
                        .map(Member::Constructor);
                }
                let return_type = p.parse_type()?;
                let name = p.accept(expect![TokenKind::Identifier])?;
                return p.parse_method_rest(
                    start,
                    modifiers,
                    annotations,
                    documentation,
                    type_parameters,
                    Some(return_type),
                    name,
                );
            }

            if p.would_accept(expect![TokenKind::Identifier, "("]) {
                return p
                    .parse_constructor_rest(start, modifiers, annotations, documentation, Vec::new())
                    .map(Member::Constructor);
            }

            let ty = p.parse_type()?;
            let name = p.accept(expect![TokenKind::Identifier])?;
            if p.would_accept(expect!["("]) {
                p.parse_method_rest(
                    start,
                    modifiers,
                    annotations,
                    documentation,
                    Vec::new(),
                    Some(ty),
                    name,
                )
            } else {
                p.parse_field_rest(start, modifiers, annotations, documentation, ty, name)
            }
        })
    }

    fn parse_field_rest(
        &mut self,
        start: Location,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
        documentation: Option<String>,
        ty: Type,
        first_name: String,
    ) -> ParseResult<Member> {
        let mut declarators = vec![self.parse_variable_declarator_rest(first_name)?];
        while self.try_accept(expect![","]) {
            let name = self.accept(expect![TokenKind::Identifier])?;
            declarators.push(self.parse_variable_declarator_rest(name)?);
        }
        self.accept(expect![";"])?;
        Ok(Member::Field(FieldDeclaration {
            modifiers,
            annotations,
            documentation,
            ty,
            declarators,
            span: self.span_from(start),
        }))
    }

    fn parse_variable_declarator_rest(&mut self, name: String) -> ParseResult<VariableDeclarator> {
        let start = self.last_location;
        let dimensions = self.parse_array_dimensions()?;
        let initializer = if self.try_accept(expect!["="]) {
            Some(self.parse_variable_initializer()?)
        } else {
            None
        };
        Ok(VariableDeclarator {
            name,
            dimensions,
            initializer,
            span: self.span_from(start),
        })
    }

    fn parse_variable_initializer(&mut self) -> ParseResult<Expr> {
        if self.would_accept(expect!["{"]) {
            self.parse_array_initializer_operand()
        } else {
            self.parse_expression()
        }
    }

    fn parse_method_rest(
        &mut self,
        start: Location,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
        documentation: Option<String>,
        type_parameters: Vec<TypeParameter>,
        mut return_type: Option<Type>,
        name: String,
    ) -> ParseResult<Member> {
        let parameters = self.parse_parameters()?;

        // `int foo()[]` appends suffix dimensions behind those already
        // declared before the name
        let extra_dimensions = self.parse_array_dimensions()?;
        match (&mut return_type, extra_dimensions.is_empty()) {
            (Some(ty), _) => ty.dimensions_mut().extend(extra_dimensions),
            (None, true) => {}
            (None, false) => {
                return Err(ParseError::unexpected_token(
                    "'{' or ';'",
                    "'['".to_string(),
                    extra_dimensions[0].start,
                ))
            }
        }

        let throws = if self.try_accept(expect!["throws"]) {
            self.parse_reference_type_list()?
        } else {
            Vec::new()
        };

        let (body, default_value) = if self.would_accept(expect!["{"]) {
            (Some(self.parse_block()?), None)
        } else if self.try_accept(expect!["default"]) {
            let value = self.parse_element_value()?;
            self.accept(expect![";"])?;
            (None, Some(value))
        } else {
            self.accept(expect![";"])?;
            (None, None)
        };

        Ok(Member::Method(MethodDeclaration {
            modifiers,
            annotations,
            documentation,
            type_parameters,
            return_type,
            name,
            parameters,
            throws,
            body,
            default_value,
            span: self.span_from(start),
        }))
    }

    fn parse_constructor_rest(
        &mut self,
        start: Location,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
        documentation: Option<String>,
        type_parameters: Vec<TypeParameter>,
    ) -> ParseResult<ConstructorDeclaration> {
        let name = self.accept(expect![TokenKind::Identifier])?;
        let parameters = self.parse_parameters()?;
        let throws = if self.try_accept(expect!["throws"]) {
            self.parse_reference_type_list()?
        } else {
            Vec::new()
        };
        let body = self.parse_block()?;
        Ok(ConstructorDeclaration {
            modifiers,
            annotations,
            documentation,
            type_parameters,
            name,
            parameters,
            throws,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        self.accept(expect!["("])?;
        let mut parameters = Vec::new();
        if !self.would_accept(expect![")"]) {
            loop {
                let start = self.here();
                let (modifiers, annotations) = self.parse_modifiers_and_annotations()?;
                let mut ty = self.parse_type()?;
                let varargs = self.try_accept(expect!["..."]);
                let name = self.accept(expect![TokenKind::Identifier])?;
                let dimensions = self.parse_array_dimensions()?;
                ty.dimensions_mut().extend(dimensions);
                parameters.push(Parameter {
                    modifiers,
                    annotations,
                    ty,
                    name,
                    varargs,
                    span: self.span_from(start),
                });
                // a varargs parameter is always last
                if varargs || !self.try_accept(expect![","]) {
                    break;
                }
            }
        }
        self.accept(expect![")"])?;
        Ok(parameters)
    }

    /// Opaque brace-balanced region; statements are not parsed
    fn parse_block(&mut self) -> ParseResult<Block> {
        self.traced("block", |p| {
            let start = p.here();
            p.accept(expect!["{"])?;
            let mut depth = 1usize;
            while depth > 0 {
                let token = p.cursor.peek(0);
                if token.is_end() {
                    return Err(ParseError::unexpected_end_of_input("'}'", token.location));
                }
                match p.bump().value.as_str() {
                    "{" => depth += 1,
                    "}" => depth -= 1,
                    _ => {}
                }
            }
            Ok(Block {
                span: p.span_from(start),
            })
        })
    }

    // Types

    pub fn parse_type(&mut self) -> ParseResult<Type> {
        if self.would_accept(expect![TokenKind::BasicType]) {
            let start = self.here();
            let name = self.accept(expect![TokenKind::BasicType])?;
            let dimensions = self.parse_array_dimensions()?;
            Ok(Type::Basic(BasicType {
                name,
                dimensions,
                span: self.span_from(start),
            }))
        } else if self.would_accept(expect![TokenKind::Identifier]) {
            let mut reference = self.parse_reference_type()?;
            let dimensions = self.parse_array_dimensions()?;
            reference.dimensions.extend(dimensions);
            reference.span = self.span_from(reference.span.start);
            Ok(Type::Reference(reference))
        } else {
            Err(self.illegal("type"))
        }
    }

    fn parse_reference_type(&mut self) -> ParseResult<ReferenceType> {
        let start = self.here();
        let name = self.accept(expect![TokenKind::Identifier])?;
        let type_arguments = if self.would_accept(expect!["<"]) {
            self.parse_type_arguments()?
        } else {
            Vec::new()
        };
        let sub_type = if self.would_accept(expect![".", TokenKind::Identifier]) {
            self.accept(expect!["."])?;
            Some(Box::new(self.parse_reference_type()?))
        } else {
            None
        };
        Ok(ReferenceType {
            name,
            type_arguments,
            sub_type,
            dimensions: Vec::new(),
            span: self.span_from(start),
        })
    }

    fn parse_reference_type_list(&mut self) -> ParseResult<Vec<ReferenceType>> {
        let mut types = vec![self.parse_reference_type()?];
        while self.try_accept(expect![","]) {
            types.push(self.parse_reference_type()?);
        }
        Ok(types)
    }

    fn parse_type_arguments(&mut self) -> ParseResult<Vec<TypeArgument>> {
        self.accept(expect!["<"])?;
        let mut arguments = vec![self.parse_type_argument()?];
        while self.try_accept(expect![","]) {
            arguments.push(self.parse_type_argument()?);
        }
        self.accept_generic_close()?;
        Ok(arguments)
    }

    fn parse_type_argument(&mut self) -> ParseResult<TypeArgument> {
        if self.would_accept(expect!["?"]) {
            let start = self.here();
            self.accept(expect!["?"])?;
            let bound = if self.try_accept(expect!["extends"]) {
                Some((BoundKind::Extends, self.parse_type()?))
            } else if self.try_accept(expect!["super"]) {
                Some((BoundKind::Super, self.parse_type()?))
            } else {
                None
            };
            Ok(TypeArgument::Wildcard(Wildcard {
                bound,
                span: self.span_from(start),
            }))
        } else {
            Ok(TypeArgument::Type(self.parse_type()?))
        }
    }

    fn parse_type_parameters(&mut self) -> ParseResult<Vec<TypeParameter>> {
        self.accept(expect!["<"])?;
        let mut parameters = vec![self.parse_type_parameter()?];
        while self.try_accept(expect![","]) {
            parameters.push(self.parse_type_parameter()?);
        }
        self.accept_generic_close()?;
        Ok(parameters)
    }

    fn parse_type_parameter(&mut self) -> ParseResult<TypeParameter> {
        let start = self.here();
        let name = self.accept(expect![TokenKind::Identifier])?;
        let mut bounds = Vec::new();
        if self.try_accept(expect!["extends"]) {
            bounds.push(self.parse_reference_type()?);
            while self.try_accept(expect!["&"]) {
                bounds.push(self.parse_reference_type()?);
            }
        }
        Ok(TypeParameter {
            name,
            bounds,
            span: self.span_from(start),
        })
    }

    fn parse_array_dimensions(&mut self) -> ParseResult<Vec<Span>> {
        let mut dimensions = Vec::new();
        while self.would_accept(expect!["["]) {
            let start = self.here();
            self.accept(expect!["[", "]"])?;
            dimensions.push(self.span_from(start));
        }
        Ok(dimensions)
    }

    /// Accept one closing `>` of a type argument or parameter list
    ///
    /// The external lexer may have delivered `>>` or `>>>` as a single shift
    /// operator token; the surplus closes are owed to enclosing lists.
    fn accept_generic_close(&mut self) -> ParseResult<()> {
        if self.pending_closes > 0 {
            self.pending_closes -= 1;
            return Ok(());
        }
        let value = self.cursor.peek(0).value.clone();
        match value.as_str() {
            ">" => {
                self.bump();
            }
            ">>" => {
                self.bump();
                self.pending_closes += 1;
            }
            ">>>" => {
                self.bump();
                self.pending_closes += 2;
            }
            _ => return Err(self.illegal("'>'")),
        }
        Ok(())
    }

    // Annotations

    pub fn parse_annotation(&mut self) -> ParseResult<Annotation> {
        self.traced("annotation", |p| {
            let start = p.here();
            p.accept(expect![TokenKind::Annotation])?;
            let name = p.parse_qualified_name()?;
            let element = if p.try_accept(expect!["("]) {
                let element = if p.would_accept(expect![TokenKind::Identifier, "="]) {
                    Some(AnnotationElement::Pairs(p.parse_element_value_pairs()?))
                } else if !p.would_accept(expect![")"]) {
                    Some(AnnotationElement::Value(p.parse_element_value()?))
                } else {
                    None
                };
                p.accept(expect![")"])?;
                element
            } else {
                None
            };
            Ok(Annotation {
                name,
                element,
                span: p.span_from(start),
            })
        })
    }

    fn parse_element_value_pairs(&mut self) -> ParseResult<Vec<ElementValuePair>> {
        let mut pairs = vec![self.parse_element_value_pair()?];
        while self.try_accept(expect![","]) {
            pairs.push(self.parse_element_value_pair()?);
        }
        Ok(pairs)
    }

    fn parse_element_value_pair(&mut self) -> ParseResult<ElementValuePair> {
        let start = self.here();
        let name = self.accept(expect![TokenKind::Identifier])?;
        self.accept(expect!["="])?;
        let value = self.parse_element_value()?;
        Ok(ElementValuePair {
            name,
            value,
            span: self.span_from(start),
        })
    }

    fn parse_element_value(&mut self) -> ParseResult<ElementValue> {
        if self.would_accept(expect![TokenKind::Annotation]) {
            Ok(ElementValue::Annotation(Box::new(self.parse_annotation()?)))
        } else if self.try_accept(expect!["{"]) {
            let mut values = Vec::new();
            loop {
                if self.would_accept(expect!["}"]) {
                    break;
                }
                values.push(self.parse_element_value()?);
                if !self.try_accept(expect![","]) {
                    break;
                }
            }
            self.accept(expect!["}"])?;
            Ok(ElementValue::Array(values))
        } else {
            Ok(ElementValue::Expression(self.parse_expression()?))
        }
    }

    // Expressions

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.accept(expect!["("])?;
        let mut arguments = Vec::new();
        if !self.would_accept(expect![")"]) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.try_accept(expect![","]) {
                    break;
                }
            }
        }
        self.accept(expect![")"])?;
        Ok(arguments)
    }

    /// Parse a binary expression; every non-binary form is an opaque operand
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.traced("expression", |p| {
            let mut parts = vec![ExprPart::Operand(p.parse_operand()?)];
            loop {
                let token = p.cursor.peek(0);
                let is_operator = (token.kind == TokenKind::Operator
                    && is_binary_operator(&token.value))
                    || token.value == "instanceof";
                if !is_operator {
                    break;
                }
                let operator = p.bump().value;
                if operator == "instanceof" {
                    // the right side is a type, carried as an opaque operand
                    let ty = p.parse_type()?;
                    parts.push(ExprPart::Operator(operator));
                    parts.push(ExprPart::Operand(Expr::Operand(OperandExpr {
                        text: ty.to_string(),
                        span: ty.span(),
                    })));
                } else {
                    parts.push(ExprPart::Operator(operator));
                    parts.push(ExprPart::Operand(p.parse_operand()?));
                }
            }
            build_binary_operation(&parts, 0)
        })
    }

    /// Capture one opaque operand: a primary expression with balanced
    /// bracketing, stopping at any top-level binary operator or delimiter
    fn parse_operand(&mut self) -> ParseResult<Expr> {
        let start = self.here();
        let mut pieces: Vec<String> = Vec::new();
        let mut depth = 0usize;
        let mut ternary_depth = 0usize;
        let mut saw_new = false;
        loop {
            let token = self.cursor.peek(0);
            if token.is_end() {
                break;
            }
            let value = token.value.clone();
            if depth == 0 {
                if matches!(value.as_str(), "," | ")" | "]" | "}" | ";" | "=") {
                    break;
                }
                // a conditional is swallowed whole; only a foreign `:` ends
                // the operand
                if value == ":" {
                    if ternary_depth == 0 {
                        break;
                    }
                    ternary_depth -= 1;
                } else if value == "?" {
                    ternary_depth += 1;
                }
                let inside_ternary = ternary_depth > 0;
                let is_prefix = pieces.is_empty()
                    && matches!(value.as_str(), "+" | "-" | "!" | "~" | "++" | "--");
                if (is_binary_operator(&value) || value == "instanceof")
                    && !is_prefix
                    && !inside_ternary
                    && !(saw_new && value == "<")
                {
                    break;
                }
                if saw_new && value == "<" {
                    // constructor type arguments, including the diamond form
                    self.capture_generic_suffix(&mut pieces)?;
                    continue;
                }
            }
            if value == "new" {
                saw_new = true;
            }
            match value.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth -= 1,
                _ => {}
            }
            self.bump();
            pieces.push(value);
        }
        if pieces.is_empty() {
            return Err(self.illegal("expression"));
        }
        Ok(Expr::Operand(OperandExpr {
            text: pieces.join(" "),
            span: self.span_from(start),
        }))
    }

    /// Consume a balanced `<...>` group verbatim into the operand text
    fn capture_generic_suffix(&mut self, pieces: &mut Vec<String>) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            let token = self.cursor.peek(0);
            if token.is_end() {
                return Err(ParseError::unexpected_end_of_input("'>'", token.location));
            }
            let value = self.bump().value;
            match value.as_str() {
                "<" => depth += 1,
                ">" => depth = depth.saturating_sub(1),
                ">>" => depth = depth.saturating_sub(2),
                ">>>" => depth = depth.saturating_sub(3),
                _ => {}
            }
            pieces.push(value);
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Opaque array initializer: `{ 1, 2, 3 }` captured verbatim
    fn parse_array_initializer_operand(&mut self) -> ParseResult<Expr> {
        let start = self.here();
        let mut pieces: Vec<String> = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = self.cursor.peek(0);
            if token.is_end() {
                return Err(ParseError::unexpected_end_of_input("'}'", token.location));
            }
            let value = self.bump().value;
            match value.as_str() {
                "{" => depth += 1,
                "}" => depth -= 1,
                _ => {}
            }
            pieces.push(value);
            if depth == 0 {
                break;
            }
        }
        Ok(Expr::Operand(OperandExpr {
            text: pieces.join(" "),
            span: self.span_from(start),
        }))
    }
}
