//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements   | Connects to                       |
//! |--------------|--------------|-----------------------------------|
//! | `hardware`   | SensorPort   | BMP280 + AHT20 over I2C           |
//! |              | ActuatorPort | LED matrix, buzzers, RGB LED      |
//! |              | DisplayPort  | SSD1306 OLED                      |
//! | `log_sink`   | EventSink    | Serial log output                 |
//! | `bootloader` |              | Chip restart on factory reset     |
//! | `time`       |              | ESP32 system timer                |
//! | `wifi`       |              | ESP-IDF WiFi STA bring-up         |

pub mod bootloader;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod wifi;
