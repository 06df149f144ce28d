use core::panic::PanicInfo;

use prism::console_println;

#[inline(never)]
#[panic_handler]
pub fn panic(info: &PanicInfo) -> ! {
    match info.location() {
        Some(loc) => {
            console_println!("SP panicked at {}:{}: {}", loc.file(), loc.line(), info.message());
        }
        None => {
            console_println!("SP panicked: {}", info.message());
        }
    }
    console_println!("Stopping execution now.");

    loop {
        continue;
    }
}
