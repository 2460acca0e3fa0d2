//! Static finger-pose descriptions for the 26 fingerspelled letters.
//!
//! J and Z are motion letters; they are described by their end pose.

use std::sync::LazyLock;

use super::{
    description::GestureDescription,
    finger::{
        Finger::{Index, Middle, Pinky, Ring, Thumb},
        FingerCurl::{FullCurl, HalfCurl, NoCurl},
        FingerDirection::{
            DiagonalDownLeft, DiagonalDownRight, DiagonalUpLeft, DiagonalUpRight, HorizontalLeft,
            HorizontalRight, VerticalDown, VerticalUp,
        },
    },
};

static ALPHABET: LazyLock<Vec<GestureDescription>> = LazyLock::new(|| {
    vec![
        a(),
        b(),
        c(),
        d(),
        e(),
        f(),
        g(),
        h(),
        i(),
        j(),
        k(),
        l(),
        m(),
        n(),
        o(),
        p(),
        q(),
        r(),
        s(),
        t(),
        u(),
        v(),
        w(),
        x(),
        y(),
        z(),
    ]
});

/// All 26 letter descriptions, `A` through `Z`, built once.
pub fn alphabet() -> &'static [GestureDescription] {
    &ALPHABET
}

fn a() -> GestureDescription {
    GestureDescription::new("A")
        .curl(Thumb, NoCurl, 1.0)
        .direction(Thumb, VerticalUp, 1.0)
        .direction(Thumb, DiagonalUpLeft, 0.8)
        .direction(Thumb, DiagonalUpRight, 0.8)
        .curl(Index, FullCurl, 1.0)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn b() -> GestureDescription {
    GestureDescription::new("B")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, FullCurl, 0.9)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, VerticalUp, 1.0)
        .curl(Middle, NoCurl, 1.0)
        .direction(Middle, VerticalUp, 1.0)
        .curl(Ring, NoCurl, 1.0)
        .direction(Ring, VerticalUp, 1.0)
        .curl(Pinky, NoCurl, 1.0)
        .direction(Pinky, VerticalUp, 1.0)
}

fn c() -> GestureDescription {
    let mut sign = GestureDescription::new("C")
        .curl(Thumb, NoCurl, 1.0)
        .curl(Thumb, HalfCurl, 0.8);
    for finger in [Index, Middle, Ring, Pinky] {
        sign = sign
            .curl(finger, HalfCurl, 1.0)
            .direction(finger, HorizontalLeft, 1.0)
            .direction(finger, HorizontalRight, 1.0)
            .direction(finger, DiagonalUpLeft, 0.7)
            .direction(finger, DiagonalUpRight, 0.7);
    }
    sign
}

fn d() -> GestureDescription {
    GestureDescription::new("D")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, VerticalUp, 1.0)
        .curl(Middle, FullCurl, 1.0)
        .curl(Middle, HalfCurl, 0.8)
        .curl(Ring, FullCurl, 1.0)
        .curl(Ring, HalfCurl, 0.8)
        .curl(Pinky, FullCurl, 1.0)
        .curl(Pinky, HalfCurl, 0.8)
}

fn e() -> GestureDescription {
    GestureDescription::new("E")
        .curl(Thumb, FullCurl, 1.0)
        .curl(Thumb, HalfCurl, 0.8)
        .direction(Thumb, HorizontalLeft, 0.8)
        .direction(Thumb, HorizontalRight, 0.8)
        .curl(Index, FullCurl, 1.0)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn f() -> GestureDescription {
    GestureDescription::new("F")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Index, FullCurl, 1.0)
        .curl(Index, HalfCurl, 0.8)
        .curl(Middle, NoCurl, 1.0)
        .direction(Middle, VerticalUp, 1.0)
        .curl(Ring, NoCurl, 1.0)
        .direction(Ring, VerticalUp, 1.0)
        .curl(Pinky, NoCurl, 1.0)
        .direction(Pinky, VerticalUp, 1.0)
}

fn g() -> GestureDescription {
    GestureDescription::new("G")
        .curl(Thumb, NoCurl, 1.0)
        .direction(Thumb, HorizontalLeft, 1.0)
        .direction(Thumb, HorizontalRight, 1.0)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, HorizontalLeft, 1.0)
        .direction(Index, HorizontalRight, 1.0)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn h() -> GestureDescription {
    GestureDescription::new("H")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, NoCurl, 0.6)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, HorizontalLeft, 1.0)
        .direction(Index, HorizontalRight, 1.0)
        .curl(Middle, NoCurl, 1.0)
        .direction(Middle, HorizontalLeft, 1.0)
        .direction(Middle, HorizontalRight, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn i() -> GestureDescription {
    GestureDescription::new("I")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, FullCurl, 0.8)
        .curl(Index, FullCurl, 1.0)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, NoCurl, 1.0)
        .direction(Pinky, VerticalUp, 1.0)
}

fn j() -> GestureDescription {
    GestureDescription::new("J")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, FullCurl, 0.8)
        .curl(Index, FullCurl, 1.0)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, NoCurl, 1.0)
        .direction(Pinky, DiagonalUpLeft, 1.0)
        .direction(Pinky, DiagonalUpRight, 1.0)
        .direction(Pinky, HorizontalLeft, 0.8)
        .direction(Pinky, HorizontalRight, 0.8)
}

fn k() -> GestureDescription {
    GestureDescription::new("K")
        .curl(Thumb, NoCurl, 1.0)
        .direction(Thumb, DiagonalUpLeft, 1.0)
        .direction(Thumb, DiagonalUpRight, 1.0)
        .direction(Thumb, VerticalUp, 0.6)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, VerticalUp, 1.0)
        .curl(Middle, NoCurl, 1.0)
        .direction(Middle, DiagonalUpLeft, 1.0)
        .direction(Middle, DiagonalUpRight, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn l() -> GestureDescription {
    GestureDescription::new("L")
        .curl(Thumb, NoCurl, 1.0)
        .direction(Thumb, HorizontalLeft, 1.0)
        .direction(Thumb, HorizontalRight, 1.0)
        .direction(Thumb, DiagonalUpLeft, 0.6)
        .direction(Thumb, DiagonalUpRight, 0.6)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, VerticalUp, 1.0)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn m() -> GestureDescription {
    let mut sign = GestureDescription::new("M")
        .curl(Thumb, FullCurl, 1.0)
        .curl(Thumb, HalfCurl, 0.6)
        .curl(Pinky, FullCurl, 1.0);
    for finger in [Index, Middle, Ring] {
        sign = sign
            .curl(finger, FullCurl, 1.0)
            .curl(finger, HalfCurl, 0.6)
            .direction(finger, VerticalDown, 1.0)
            .direction(finger, DiagonalDownLeft, 0.8)
            .direction(finger, DiagonalDownRight, 0.8);
    }
    sign
}

fn n() -> GestureDescription {
    let mut sign = GestureDescription::new("N")
        .curl(Thumb, FullCurl, 1.0)
        .curl(Thumb, HalfCurl, 0.6)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0);
    for finger in [Index, Middle] {
        sign = sign
            .curl(finger, FullCurl, 1.0)
            .curl(finger, HalfCurl, 0.6)
            .direction(finger, VerticalDown, 1.0)
            .direction(finger, DiagonalDownLeft, 0.8)
            .direction(finger, DiagonalDownRight, 0.8);
    }
    sign
}

fn o() -> GestureDescription {
    let mut sign = GestureDescription::new("O").curl(Thumb, HalfCurl, 1.0);
    for finger in [Index, Middle, Ring, Pinky] {
        sign = sign
            .curl(finger, HalfCurl, 1.0)
            .curl(finger, FullCurl, 0.5)
            .direction(finger, DiagonalUpLeft, 1.0)
            .direction(finger, DiagonalUpRight, 1.0)
            .direction(finger, HorizontalLeft, 0.7)
            .direction(finger, HorizontalRight, 0.7);
    }
    sign
}

fn p() -> GestureDescription {
    GestureDescription::new("P")
        .curl(Thumb, NoCurl, 1.0)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, DiagonalDownLeft, 1.0)
        .direction(Index, DiagonalDownRight, 1.0)
        .direction(Index, HorizontalLeft, 0.6)
        .direction(Index, HorizontalRight, 0.6)
        .curl(Middle, NoCurl, 1.0)
        .curl(Middle, HalfCurl, 1.0)
        .direction(Middle, VerticalDown, 1.0)
        .direction(Middle, DiagonalDownLeft, 0.8)
        .direction(Middle, DiagonalDownRight, 0.8)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn q() -> GestureDescription {
    GestureDescription::new("Q")
        .curl(Thumb, NoCurl, 1.0)
        .direction(Thumb, VerticalDown, 1.0)
        .direction(Thumb, DiagonalDownLeft, 0.8)
        .direction(Thumb, DiagonalDownRight, 0.8)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, VerticalDown, 1.0)
        .direction(Index, DiagonalDownLeft, 0.8)
        .direction(Index, DiagonalDownRight, 0.8)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn r() -> GestureDescription {
    GestureDescription::new("R")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, FullCurl, 0.8)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, DiagonalUpRight, 1.0)
        .direction(Index, DiagonalUpLeft, 1.0)
        .direction(Index, VerticalUp, 0.6)
        .curl(Middle, NoCurl, 1.0)
        .direction(Middle, VerticalUp, 1.0)
        .direction(Middle, DiagonalUpLeft, 0.6)
        .direction(Middle, DiagonalUpRight, 0.6)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn s() -> GestureDescription {
    GestureDescription::new("S")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, NoCurl, 0.6)
        .direction(Thumb, HorizontalLeft, 1.0)
        .direction(Thumb, HorizontalRight, 1.0)
        .direction(Thumb, DiagonalUpLeft, 0.6)
        .direction(Thumb, DiagonalUpRight, 0.6)
        .curl(Index, FullCurl, 1.0)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn t() -> GestureDescription {
    GestureDescription::new("T")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, NoCurl, 0.5)
        .direction(Thumb, VerticalUp, 1.0)
        .direction(Thumb, DiagonalUpLeft, 0.8)
        .direction(Thumb, DiagonalUpRight, 0.8)
        .curl(Index, HalfCurl, 1.0)
        .curl(Index, FullCurl, 0.6)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn u() -> GestureDescription {
    GestureDescription::new("U")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, FullCurl, 0.8)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, VerticalUp, 1.0)
        .curl(Middle, NoCurl, 1.0)
        .direction(Middle, VerticalUp, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn v() -> GestureDescription {
    GestureDescription::new("V")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, FullCurl, 0.8)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, DiagonalUpLeft, 1.0)
        .direction(Index, DiagonalUpRight, 1.0)
        .curl(Middle, NoCurl, 1.0)
        .direction(Middle, DiagonalUpLeft, 1.0)
        .direction(Middle, DiagonalUpRight, 1.0)
        .direction(Middle, VerticalUp, 0.6)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn w() -> GestureDescription {
    GestureDescription::new("W")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, FullCurl, 0.8)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, DiagonalUpLeft, 1.0)
        .direction(Index, DiagonalUpRight, 1.0)
        .curl(Middle, NoCurl, 1.0)
        .direction(Middle, VerticalUp, 1.0)
        .curl(Ring, NoCurl, 1.0)
        .direction(Ring, DiagonalUpLeft, 1.0)
        .direction(Ring, DiagonalUpRight, 1.0)
        .curl(Pinky, FullCurl, 1.0)
        .curl(Pinky, HalfCurl, 0.8)
}

fn x() -> GestureDescription {
    GestureDescription::new("X")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, NoCurl, 0.6)
        .curl(Index, HalfCurl, 1.0)
        .direction(Index, VerticalUp, 1.0)
        .direction(Index, DiagonalUpLeft, 0.8)
        .direction(Index, DiagonalUpRight, 0.8)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}

fn y() -> GestureDescription {
    GestureDescription::new("Y")
        .curl(Thumb, NoCurl, 1.0)
        .direction(Thumb, DiagonalUpLeft, 1.0)
        .direction(Thumb, DiagonalUpRight, 1.0)
        .direction(Thumb, HorizontalLeft, 0.8)
        .direction(Thumb, HorizontalRight, 0.8)
        .curl(Index, FullCurl, 1.0)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, NoCurl, 1.0)
        .direction(Pinky, DiagonalUpLeft, 1.0)
        .direction(Pinky, DiagonalUpRight, 1.0)
        .direction(Pinky, HorizontalLeft, 0.8)
        .direction(Pinky, HorizontalRight, 0.8)
}

fn z() -> GestureDescription {
    GestureDescription::new("Z")
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, NoCurl, 0.6)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, DiagonalUpLeft, 1.0)
        .direction(Index, DiagonalUpRight, 1.0)
        .direction(Index, HorizontalLeft, 0.7)
        .direction(Index, HorizontalRight, 0.7)
        .curl(Middle, FullCurl, 1.0)
        .curl(Ring, FullCurl, 1.0)
        .curl(Pinky, FullCurl, 1.0)
}
