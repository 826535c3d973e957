use super::*;

#[test]
fn resolution_parses_presets_and_custom_strings() {
    for preset in RESOLUTION_PRESETS {
        let r: Resolution = preset.parse().unwrap();
        assert_eq!(r.to_string(), *preset);
    }
    let r: Resolution = " 300X200 ".parse().unwrap();
    assert_eq!(r, Resolution::new(300, 200).unwrap());
}

#[test]
fn resolution_rejects_garbage_and_zero() {
    assert!("1280".parse::<Resolution>().is_err());
    assert!("0x720".parse::<Resolution>().is_err());
    assert!("wide x tall".parse::<Resolution>().is_err());
}

#[test]
fn resolution_serializes_as_string() {
    let r = Resolution::new(640, 360).unwrap();
    let json = serde_json::to_string(&r).unwrap();
    assert_eq!(json, "\"640x360\"");
    let back: Resolution = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);
}

#[test]
fn solid_frame_has_expected_size() {
    let frame = FrameRGBA::solid(Resolution::new(4, 3).unwrap(), [1, 2, 3, 4]);
    assert_eq!(frame.data.len(), 4 * 3 * 4);
    assert_eq!(&frame.data[..8], &[1, 2, 3, 4, 1, 2, 3, 4]);
    frame.validate().unwrap();

    let broken = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 3],
    };
    assert!(broken.validate().is_err());
}

#[test]
fn background_fills() {
    assert_eq!(Background::Current.fill_rgba(), None);
    assert_eq!(Background::Transparent.fill_rgba(), Some([0, 0, 0, 0]));
    assert_eq!(Background::White.as_str(), "White");
}
