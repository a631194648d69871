#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use defmt::{error, info};
use embassy_executor::Spawner;
use esp_hal::{
    Config,
    clock::CpuClock,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    rmt::{ConstChannelAccess, Rmt, Tx},
    rtc_cntl::Rtc,
    time::Rate,
    timer::systimer::SystemTimer,
};
use esp_hal_smartled::{SmartLedsAdapterAsync, buffer_size_async};
use led_droid::{
    Controller, Halt, STRIP_LENGTH, SequenceSelector, SharedState,
    controller::ButtonChannel,
    drivers::{LedDriver, ShiftRegister},
    tasks::{button_task, digit_display_task, strip_animation_task},
};
use panic_rtt_target as _;
use static_cell::StaticCell;

/// We must know what the LED TX buffer size is as a constant for the types involved here
const LED_INTERNAL_BUF_LEN: usize = buffer_size_async(STRIP_LENGTH);

/// The RMT adapter clocking pixels out to the strip
type StripWriter = SmartLedsAdapterAsync<ConstChannelAccess<Tx, 0>, LED_INTERNAL_BUF_LEN>;

/// 74HC595 on data / latch / clock
type DigitRegister = ShiftRegister<Output<'static>, Output<'static>, Output<'static>>;

/// State shared between the controller and the two render tasks
static SHARED: SharedState = SharedState::new(SequenceSelector::DEFAULT.character());

/// Button presses on their way to the controller
static BUTTON_CHANNEL: ButtonChannel = ButtonChannel::new();

/// Our LED driver that underlies the strip task
static LED_DRIVER: StaticCell<LedDriver<StripWriter>> = StaticCell::new();

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

/// Powers down by entering deep sleep with no wake-up source
struct DeepSleep {
    rtc: Rtc<'static>,
}

impl Halt for DeepSleep {
    fn request_halt(&mut self) {
        info!("MAIN: Entering deep sleep");
        self.rtc.sleep_deep(&[]);
    }
}

#[embassy_executor::task]
async fn digit_task(mut register: DigitRegister) {
    if let Err(e) = digit_display_task(&SHARED, &mut register).await {
        error!("MAIN: Digit task failed: {}", e);
    }
}

#[embassy_executor::task]
async fn strip_task(led: &'static mut LedDriver<StripWriter>) {
    if let Err(e) = strip_animation_task(&SHARED, led).await {
        error!("MAIN: Strip task failed: {}", e);
    }
}

#[embassy_executor::task]
async fn buttons_task(select: Input<'static>, confirm: Input<'static>, off: Input<'static>) {
    button_task(select, confirm, off, BUTTON_CHANNEL.sender()).await;
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    rtt_target::rtt_init_defmt!();

    let peripherals = esp_hal::init(Config::default().with_cpu_clock(CpuClock::max()));
    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    // Strip on GPIO2 through RMT channel 0
    let rmt = Rmt::new(peripherals.RMT, Rate::from_mhz(80))
        .expect("Failed to initialise RMT0")
        .into_async();
    let buffer = [0_u32; LED_INTERNAL_BUF_LEN];
    let strip: StripWriter = SmartLedsAdapterAsync::new(rmt.channel0, peripherals.GPIO2, buffer);
    let led_driver = LED_DRIVER.init(LedDriver::new(strip));

    // Shift register: data GPIO4, latch GPIO5, clock GPIO6
    let register = ShiftRegister::new(
        Output::new(peripherals.GPIO4, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO5, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO6, Level::Low, OutputConfig::default()),
    );

    // Set up buttons for the functions we need
    let config = InputConfig::default().with_pull(Pull::Up);
    let select = Input::new(peripherals.GPIO7, config);
    let confirm = Input::new(peripherals.GPIO8, config);
    let off = Input::new(peripherals.GPIO10, config);

    spawner
        .spawn(digit_task(register))
        .expect("Failed to spawn digit task");
    spawner
        .spawn(strip_task(led_driver))
        .expect("Failed to spawn strip task");
    spawner
        .spawn(buttons_task(select, confirm, off))
        .expect("Failed to spawn button task");

    info!("MAIN: Starting controller");
    let halt = DeepSleep {
        rtc: Rtc::new(peripherals.LPWR),
    };
    let controller = Controller::new(&SHARED, SequenceSelector::DEFAULT, halt);
    controller.run(BUTTON_CHANNEL.receiver()).await;
}
