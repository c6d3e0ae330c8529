//! Built-in example records.

use crate::record::LaptopRecord;

/// HP Victus 15 gaming laptop.
pub fn hp_victus() -> LaptopRecord {
    LaptopRecord {
        brand: "HP".into(),
        name: "Victus 15-fb0157AX Gaming Laptop".into(),
        spec_rating: 73.0,
        processor: "5th Gen AMD Ryzen 5 5600H".into(),
        cpu: "Hexa Core, 12 Threads".into(),
        ram: 8,
        ram_type: "DDR4".into(),
        rom: 512,
        rom_type: "SSD".into(),
        gpu: "4GB AMD Radeon RX 6500M".into(),
        display_size: 15.6,
        resolution_width: 1920.0,
        resolution_height: 1080.0,
        os: "Windows 11 OS".into(),
        warranty: 1,
    }
}

/// Acer Aspire 5.
pub fn acer_aspire() -> LaptopRecord {
    LaptopRecord {
        brand: "Acer".into(),
        name: "Aspire 5 A515-58M NX.KHGSI.002 Gaming Laptop".into(),
        spec_rating: 69.3,
        processor: "13th Gen Intel Core i5 1335U".into(),
        cpu: "10 Cores (2P + 8E), 12 Threads".into(),
        ram: 16,
        ram_type: "LPDDR5".into(),
        rom: 512,
        rom_type: "SSD".into(),
        gpu: "Intel Integrated Iris Xe".into(),
        display_size: 15.6,
        resolution_width: 1920.0,
        resolution_height: 1080.0,
        os: "Windows 11 OS".into(),
        warranty: 1,
    }
}

/// Lenovo Yoga Slim 6.
pub fn lenovo_yoga() -> LaptopRecord {
    LaptopRecord {
        brand: "Lenovo".into(),
        name: "Yoga Slim 6 14IAP8 82WU0095IN Laptop".into(),
        spec_rating: 66.0,
        processor: "12th Gen Intel Core i5 1240P".into(),
        cpu: "12 Cores (4P + 8E), 16 Threads".into(),
        ram: 16,
        ram_type: "LPDDR5".into(),
        rom: 512,
        rom_type: "SSD".into(),
        gpu: "Intel Integrated Iris Xe".into(),
        display_size: 14.0,
        resolution_width: 1920.0,
        resolution_height: 1200.0,
        os: "Windows 11 OS".into(),
        warranty: 1,
    }
}

/// All presets, in display order.
pub fn all() -> Vec<LaptopRecord> {
    vec![hp_victus(), acer_aspire(), lenovo_yoga()]
}
