/// Wavefront MTL material library parser
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{space0, space1, u32 as decimal},
    combinator::{all_consuming, map, opt, rest},
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::{LoadError, LoadResult};
use crate::geometry::Color;

/// Surface description referenced by `usemtl` in an OBJ file
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emissive: Color,
    pub shininess: f32,
    /// `d`, 1.0 is fully opaque
    pub opacity: f32,
    pub illumination: Option<u32>,
    /// Recorded for completeness; textures are not fetched.
    pub diffuse_map: Option<String>,
}

impl Material {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Surface colour under `irradiance`: lit diffuse plus emission.
    ///
    /// `ambient`, `specular`, `shininess` and `illumination` are kept from
    /// the file but play no part in shading.
    pub fn shade(&self, irradiance: &Color) -> Color {
        self.diffuse.modulate(irradiance) + self.emissive
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            ambient: Color::BLACK,
            diffuse: Color::new(0.8, 0.8, 0.8),
            specular: Color::BLACK,
            emissive: Color::BLACK,
            shininess: 30.0,
            opacity: 1.0,
            illumination: None,
            diffuse_map: None,
        }
    }
}

/// All materials declared by one MTL file, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    pub materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[derive(Debug, PartialEq)]
enum Statement<'a> {
    NewMaterial(&'a str),
    Ambient(Color),
    Diffuse(Color),
    Specular(Color),
    Emissive(Color),
    Shininess(f32),
    Dissolve(f32),
    Transparency(f32),
    Illumination(u32),
    DiffuseMap(&'a str),
}

const KEYWORDS: &[&str] = &[
    "newmtl", "Ka", "Kd", "Ks", "Ke", "Ns", "d", "Tr", "illum", "map_Kd",
];

/// Parse an MTL document. `file` is only used to label errors.
pub fn parse_mtl(file: &str, input: &str) -> LoadResult<MaterialLibrary> {
    let mut library = MaterialLibrary::default();
    let mut current: Option<Material> = None;

    for (index, raw) in input.lines().enumerate() {
        let line = strip_comment(raw).trim();
        let Some(keyword) = line.split_whitespace().next() else {
            continue;
        };
        if !KEYWORDS.contains(&keyword) {
            continue;
        }

        let statement = match all_consuming(statement)(line) {
            Ok((_, statement)) => statement,
            Err(_) => {
                return Err(LoadError::parse(
                    file,
                    index + 1,
                    format!("malformed `{keyword}` statement"),
                ))
            }
        };

        match statement {
            Statement::NewMaterial(name) => {
                library.materials.extend(current.take());
                current = Some(Material::named(name));
            }
            other => match current.as_mut() {
                Some(material) => apply(material, other),
                None => log::warn!("{file}:{}: `{keyword}` before any newmtl, ignored", index + 1),
            },
        }
    }

    library.materials.extend(current);
    Ok(library)
}

fn apply(material: &mut Material, statement: Statement<'_>) {
    match statement {
        Statement::NewMaterial(_) => {}
        Statement::Ambient(c) => material.ambient = c,
        Statement::Diffuse(c) => material.diffuse = c,
        Statement::Specular(c) => material.specular = c,
        Statement::Emissive(c) => material.emissive = c,
        Statement::Shininess(ns) => material.shininess = ns,
        Statement::Dissolve(d) => material.opacity = d,
        Statement::Transparency(tr) => material.opacity = 1.0 - tr,
        Statement::Illumination(model) => material.illumination = Some(model),
        Statement::DiffuseMap(path) => material.diffuse_map = Some(path.to_string()),
    }
}

pub(crate) fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        map(preceded(keyword("newmtl"), name), Statement::NewMaterial),
        map(preceded(keyword("Ka"), color), Statement::Ambient),
        map(preceded(keyword("Kd"), color), Statement::Diffuse),
        map(preceded(keyword("Ks"), color), Statement::Specular),
        map(preceded(keyword("Ke"), color), Statement::Emissive),
        map(preceded(keyword("Ns"), trailing(float)), Statement::Shininess),
        map(preceded(keyword("d"), trailing(float)), Statement::Dissolve),
        map(preceded(keyword("Tr"), trailing(float)), Statement::Transparency),
        map(preceded(keyword("illum"), trailing(decimal)), Statement::Illumination),
        map(preceded(keyword("map_Kd"), name), Statement::DiffuseMap),
    ))(input)
}

/// A keyword followed by at least one space
pub(crate) fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), space1)
}

/// The rest of the line, trimmed. Names may contain spaces.
pub(crate) fn name(input: &str) -> IResult<&str, &str> {
    map(rest, str::trim_end)(input)
}

fn trailing<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    terminated(parser, space0)
}

/// `r [g b]`; a single component is a grey level.
fn color(input: &str) -> IResult<&str, Color> {
    let (input, r) = float(input)?;
    let (input, gb) = opt(tuple((
        preceded(space1, float),
        preceded(space1, float),
    )))(input)?;
    let (input, _) = space0(input)?;
    let (g, b) = gb.unwrap_or((r, r));
    Ok((input, Color::new(r, g, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_color(actual: Color, expected: Color) {
        assert!(
            (actual.r - expected.r).abs() < 1e-6
                && (actual.g - expected.g).abs() < 1e-6
                && (actual.b - expected.b).abs() < 1e-6,
            "{actual:?} != {expected:?}"
        );
    }

    const KNOT_MTL: &str = "\
# Blender MTL File
newmtl knot_left
Ns 250.000000
Ka 1.000000 1.000000 1.000000
Kd 0.800000 0.100000 0.050000
Ks 0.500000 0.500000 0.500000
Ke 0.0 0.0 0.0
d 0.75
illum 2

newmtl plain
Kd 0.5
";

    #[test]
    fn test_parse_materials() {
        let library = parse_mtl("knot.mtl", KNOT_MTL).unwrap();
        assert_eq!(library.len(), 2);

        let knot = library.get("knot_left").unwrap();
        assert_color(knot.diffuse, Color::new(0.8, 0.1, 0.05));
        assert!((knot.shininess - 250.0).abs() < 1e-3);
        assert_eq!(knot.illumination, Some(2));
        assert!(knot.is_transparent());

        let plain = library.get("plain").unwrap();
        assert_color(plain.diffuse, Color::new(0.5, 0.5, 0.5));
        assert!(!plain.is_transparent());
    }

    #[test]
    fn test_shade_adds_emission() {
        let library = parse_mtl("glow.mtl", "newmtl glow\nKd 0.5 0.5 0.5\nKe 0.1 0.2 0.3\n").unwrap();
        let glow = library.get("glow").unwrap();

        assert_color(glow.shade(&Color::WHITE), Color::new(0.6, 0.7, 0.8));
        // Unlit faces still show the emissive colour
        assert_color(glow.shade(&Color::BLACK), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_transparency_inverts_dissolve() {
        let library = parse_mtl("t.mtl", "newmtl glass\nTr 0.25\n").unwrap();
        let glass = library.get("glass").unwrap();
        assert!((glass.opacity - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_statements_are_skipped() {
        let library = parse_mtl("u.mtl", "newmtl a\nNi 1.45\nmap_Bump bump.png\n").unwrap();
        assert_eq!(library.get("a").unwrap(), &Material::named("a"));
    }

    #[test]
    fn test_texture_path_is_recorded() {
        let library = parse_mtl("m.mtl", "newmtl a\nmap_Kd textures/knot diffuse.png\n").unwrap();
        assert_eq!(
            library.get("a").unwrap().diffuse_map.as_deref(),
            Some("textures/knot diffuse.png")
        );
    }

    #[test]
    fn test_malformed_statement_reports_line() {
        let err = parse_mtl("bad.mtl", "newmtl a\n\nKd red green blue\n").unwrap_err();
        match err {
            LoadError::Parse { file, line, .. } => {
                assert_eq!(file, "bad.mtl");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
