//! The built-in catalog installed into [`super::Registry::global`] (§3).

use super::kinds::{Component, ComponentFlags, Model, ModelFamily, NumericType, Sampling, SpaceClass, Space, Trc};
use super::spacebuild::build_rgb_to_xyz;
use super::Registry;

pub fn populate(registry: &Registry) {
    register_numeric_types(registry);
    register_components(registry);
    register_models(registry);
    register_samplings(registry);
    register_trcs_and_spaces(registry);
}

fn register_numeric_types(registry: &Registry) {
    let types = [
        NumericType {
            name: "u8",
            bits: 8,
            is_float: false,
            is_signed: false,
            min: 0.0,
            max: 255.0,
            min_val: 0.0,
            max_val: 1.0,
        },
        NumericType {
            name: "u8-luma",
            bits: 8,
            is_float: false,
            is_signed: false,
            min: 16.0,
            max: 235.0,
            min_val: 0.0,
            max_val: 1.0,
        },
        NumericType {
            name: "u8-chroma",
            bits: 8,
            is_float: false,
            is_signed: false,
            min: 16.0,
            max: 240.0,
            min_val: -0.5,
            max_val: 0.5,
        },
        NumericType {
            name: "u15",
            bits: 16,
            is_float: false,
            is_signed: false,
            min: 0.0,
            max: 32768.0,
            min_val: 0.0,
            max_val: 1.0,
        },
        NumericType {
            name: "u16",
            bits: 16,
            is_float: false,
            is_signed: false,
            min: 0.0,
            max: 65535.0,
            min_val: 0.0,
            max_val: 1.0,
        },
        NumericType {
            name: "u32",
            bits: 32,
            is_float: false,
            is_signed: false,
            min: 0.0,
            max: 4294967295.0,
            min_val: 0.0,
            max_val: 1.0,
        },
        NumericType {
            name: "half",
            bits: 16,
            is_float: true,
            is_signed: true,
            min: 0.0,
            max: 1.0,
            min_val: 0.0,
            max_val: 1.0,
        },
        NumericType {
            name: "float",
            bits: 32,
            is_float: true,
            is_signed: true,
            min: 0.0,
            max: 1.0,
            min_val: 0.0,
            max_val: 1.0,
        },
        NumericType {
            name: "double",
            bits: 64,
            is_float: true,
            is_signed: true,
            min: 0.0,
            max: 1.0,
            min_val: 0.0,
            max_val: 1.0,
        },
    ];
    for t in types {
        registry.register_numeric_type(Some(t.name), t);
    }
}

fn comp(name: &'static str, flags: ComponentFlags) -> Component {
    Component { name, flags }
}

fn register_components(registry: &Registry) {
    let linear = ComponentFlags {
        linear: true,
        ..ComponentFlags::none()
    };
    let nonlinear = ComponentFlags {
        nonlinear: true,
        ..ComponentFlags::none()
    };
    let perceptual = ComponentFlags {
        perceptual: true,
        ..ComponentFlags::none()
    };
    let alpha_flag = ComponentFlags {
        alpha: true,
        ..ComponentFlags::none()
    };
    let luma = ComponentFlags {
        linear: true,
        luma: true,
        ..ComponentFlags::none()
    };
    let chroma = ComponentFlags {
        linear: true,
        chroma: true,
        ..ComponentFlags::none()
    };
    let premul_linear = ComponentFlags {
        linear: true,
        premultiplied: true,
        ..ComponentFlags::none()
    };

    let components = [
        comp("R", linear),
        comp("G", linear),
        comp("B", linear),
        comp("A", alpha_flag),
        comp("Ra", premul_linear),
        comp("Ga", premul_linear),
        comp("Ba", premul_linear),
        comp("R'", nonlinear),
        comp("G'", nonlinear),
        comp("B'", nonlinear),
        comp("R~", perceptual),
        comp("G~", perceptual),
        comp("B~", perceptual),
        comp("Y", luma),
        comp("Y'", ComponentFlags { nonlinear: true, luma: true, ..ComponentFlags::none() }),
        comp("Y~", ComponentFlags { perceptual: true, luma: true, ..ComponentFlags::none() }),
        comp("Cb", chroma),
        comp("Cr", chroma),
        comp("CIE L", ComponentFlags::none()),
        comp("CIE a", ComponentFlags::none()),
        comp("CIE b", ComponentFlags::none()),
        comp("CIE C(ab)", ComponentFlags::none()),
        comp("CIE H(ab)", ComponentFlags::none()),
        comp("hue", ComponentFlags::none()),
        comp("saturation", ComponentFlags::none()),
        comp("lightness", ComponentFlags::none()),
        comp("value", ComponentFlags::none()),
        comp("HCY chroma", ComponentFlags::none()),
        comp("HCY luma", luma),
        comp("cyan", ComponentFlags::none()),
        comp("magenta", ComponentFlags::none()),
        comp("yellow", ComponentFlags::none()),
        comp("key", ComponentFlags::none()),
        comp("index", ComponentFlags::none()),
    ];
    for c in components {
        registry.register_component(Some(c.name), c);
    }
}

fn register_models(registry: &Registry) {
    let handle = |name: &str| registry.lookup_component(name).expect("component registered above");

    let rgba = Model {
        name: "RGBA",
        components: vec![handle("R"), handle("G"), handle("B"), handle("A")],
        has_alpha: true,
        premultiplied: false,
        family: ModelFamily::Rgb,
    };
    let rgb = Model {
        name: "RGB",
        components: vec![handle("R"), handle("G"), handle("B")],
        has_alpha: false,
        premultiplied: false,
        family: ModelFamily::Rgb,
    };
    let rprimegprimebprimea = Model {
        name: "R'G'B'A",
        components: vec![handle("R'"), handle("G'"), handle("B'"), handle("A")],
        has_alpha: true,
        premultiplied: false,
        family: ModelFamily::Rgb,
    };
    let ragabaa = Model {
        name: "RaGaBaA",
        components: vec![handle("Ra"), handle("Ga"), handle("Ba"), handle("A")],
        has_alpha: true,
        premultiplied: true,
        family: ModelFamily::Rgb,
    };
    let cmy = Model {
        name: "CMY",
        components: vec![handle("cyan"), handle("magenta"), handle("yellow")],
        has_alpha: false,
        premultiplied: false,
        family: ModelFamily::Cmy,
    };
    let cmyk = Model {
        name: "CMYK",
        components: vec![handle("cyan"), handle("magenta"), handle("yellow"), handle("key")],
        has_alpha: false,
        premultiplied: false,
        family: ModelFamily::Cmyk,
    };
    let y = Model {
        name: "Y",
        components: vec![handle("Y")],
        has_alpha: false,
        premultiplied: false,
        family: ModelFamily::Gray,
    };
    let ya = Model {
        name: "YA",
        components: vec![handle("Y"), handle("A")],
        has_alpha: true,
        premultiplied: false,
        family: ModelFamily::Gray,
    };
    let yprimea = Model {
        name: "Y'A",
        components: vec![handle("Y'"), handle("A")],
        has_alpha: true,
        premultiplied: false,
        family: ModelFamily::Gray,
    };
    let perceptual_rgba = Model {
        name: "R~G~B~A",
        components: vec![handle("R~"), handle("G~"), handle("B~"), handle("A")],
        has_alpha: true,
        premultiplied: false,
        family: ModelFamily::Rgb,
    };
    let ycbcr601 = Model {
        name: "Y'CbCr",
        components: vec![handle("Y'"), handle("Cb"), handle("Cr")],
        has_alpha: false,
        premultiplied: false,
        family: ModelFamily::YCbCr,
    };
    let ycbcr709 = Model {
        name: "Y'CbCr709",
        components: vec![handle("Y'"), handle("Cb"), handle("Cr")],
        has_alpha: false,
        premultiplied: false,
        family: ModelFamily::YCbCr,
    };
    let hsla = Model {
        name: "HSLA",
        components: vec![handle("hue"), handle("saturation"), handle("lightness"), handle("A")],
        has_alpha: true,
        premultiplied: false,
        family: ModelFamily::Hsl,
    };
    let hsva = Model {
        name: "HSVA",
        components: vec![handle("hue"), handle("saturation"), handle("value"), handle("A")],
        has_alpha: true,
        premultiplied: false,
        family: ModelFamily::Hsv,
    };
    let hcya = Model {
        name: "HCYA",
        components: vec![handle("hue"), handle("HCY chroma"), handle("HCY luma"), handle("A")],
        has_alpha: true,
        premultiplied: false,
        family: ModelFamily::Hcy,
    };
    let hcy = Model {
        name: "HCY",
        components: vec![handle("hue"), handle("HCY chroma"), handle("HCY luma")],
        has_alpha: false,
        premultiplied: false,
        family: ModelFamily::Hcy,
    };
    let lab = Model {
        name: "CIE Lab",
        components: vec![handle("CIE L"), handle("CIE a"), handle("CIE b")],
        has_alpha: false,
        premultiplied: false,
        family: ModelFamily::Cie,
    };
    let lch = Model {
        name: "CIE LCh(ab)",
        components: vec![handle("CIE L"), handle("CIE C(ab)"), handle("CIE H(ab)")],
        has_alpha: false,
        premultiplied: false,
        family: ModelFamily::Cie,
    };

    for m in [
        rgba,
        rgb,
        rprimegprimebprimea,
        ragabaa,
        cmy,
        cmyk,
        y,
        ya,
        yprimea,
        perceptual_rgba,
        ycbcr601,
        ycbcr709,
        hsla,
        hsva,
        hcya,
        hcy,
        lab,
        lch,
    ] {
        registry.register_model(Some(m.name), m);
    }
}

fn register_samplings(registry: &Registry) {
    registry.register_sampling(Some("1x1"), Sampling::NONE);
    registry.register_sampling(Some("2x2"), Sampling { horizontal: 2, vertical: 2 });
}

fn register_trcs_and_spaces(registry: &Registry) {
    let linear = registry.register_trc(Some("linear"), Trc::Linear);
    let srgb_trc = registry.register_trc(Some("sRGB"), Trc::Srgb);
    registry.register_trc(Some("gamma-2.2"), Trc::Gamma(2.2));
    // Registered so the ICC parametric-curve dispatch in `Trc::to_linear`/
    // `Trc::from_linear` is exercised by a real, routable TRC.
    registry.register_trc(
        Some("Rec709"),
        Trc::Parametric(crate::math::gamma::ParametricCurve::bt709()),
    );

    // sRGB: IEC 61966-2-1 chromaticities, D65 white, adapted to D50 per §4.3.
    let white = (0.3127, 0.3290);
    let red = (0.6400, 0.3300);
    let green = (0.3000, 0.6000);
    let blue = (0.1500, 0.0600);
    let (rgb_to_xyz, xyz_to_rgb) = build_rgb_to_xyz(white, red, green, blue, false);

    registry.register_space(
        Some("sRGB"),
        Space {
            name: Some("sRGB"),
            white_xy: white,
            primaries_xy: [red, green, blue],
            trc: [srgb_trc, srgb_trc, srgb_trc],
            class: SpaceClass::Rgb,
            rgb_to_xyz,
            xyz_to_rgb,
        },
    );

    // A linear-light RGB space sharing sRGB's primaries; this is the
    // colorimetric space the pivot format (§4.4) is expressed in.
    registry.register_space(
        Some("linear-sRGB"),
        Space {
            name: Some("linear-sRGB"),
            white_xy: white,
            primaries_xy: [red, green, blue],
            trc: [linear, linear, linear],
            class: SpaceClass::Rgb,
            rgb_to_xyz,
            xyz_to_rgb,
        },
    );
}
