use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Per-channel intensity histogram, 256 bins each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Histogram {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<u32>))]
    #[serde(with = "bins")]
    pub red: [u32; 256],
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<u32>))]
    #[serde(with = "bins")]
    pub green: [u32; 256],
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<u32>))]
    #[serde(with = "bins")]
    pub blue: [u32; 256],
}

impl Histogram {
    pub fn of(image: &RgbImage) -> Self {
        let mut red = [0u32; 256];
        let mut green = [0u32; 256];
        let mut blue = [0u32; 256];
        for px in image.pixels() {
            red[px.0[0] as usize] += 1;
            green[px.0[1] as usize] += 1;
            blue[px.0[2] as usize] += 1;
        }
        Self { red, green, blue }
    }

    /// Total number of pixels counted.
    pub fn total(&self) -> u64 {
        self.red.iter().map(|&c| c as u64).sum()
    }
}

/// serde does not derive for `[T; 256]`, so bins go through a `Vec`.
mod bins {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bins: &[u32; 256], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(bins.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u32; 256], D::Error> {
        let v = Vec::<u32>::deserialize(d)?;
        let len = v.len();
        v.try_into()
            .map_err(|_| D::Error::custom(format!("expected 256 bins, got {len}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_each_channel() {
        let img = RgbImage::from_fn(4, 1, |x, _| image::Rgb([x as u8, 7, 255]));
        let h = Histogram::of(&img);
        assert_eq!(h.total(), 4);
        assert_eq!(&h.red[0..4], &[1, 1, 1, 1]);
        assert_eq!(h.green[7], 4);
        assert_eq!(h.blue[255], 4);
    }

    #[test]
    fn test_serializes_as_named_arrays() {
        let img = RgbImage::new(2, 2);
        let json = serde_json::to_value(Histogram::of(&img)).unwrap();
        assert_eq!(json["red"].as_array().unwrap().len(), 256);
        assert_eq!(json["blue"][0], 4);

        let back: Histogram = serde_json::from_value(json).unwrap();
        assert_eq!(back.green[0], 4);
    }
}
