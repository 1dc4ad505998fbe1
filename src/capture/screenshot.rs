//! Live capture of the game window using the Windows Graphics Capture API.

use anyhow::{anyhow, Context, Result};
use image::{Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use windows::core::Interface;
use windows::Foundation::TypedEventHandler;
use windows::Graphics::Capture::{Direct3D11CaptureFramePool, GraphicsCaptureItem};
use windows::Graphics::DirectX::DirectXPixelFormat;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D::D3D_DRIVER_TYPE_HARDWARE;
use windows::Win32::Graphics::Direct3D11::{
    D3D11CreateDevice, ID3D11Device, ID3D11DeviceContext, ID3D11Resource, ID3D11Texture2D,
    D3D11_CPU_ACCESS_READ, D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_MAP_READ, D3D11_SDK_VERSION,
    D3D11_TEXTURE2D_DESC, D3D11_USAGE_STAGING,
};
use windows::Win32::System::WinRT::Direct3D11::CreateDirect3D11DeviceFromDXGIDevice;
use windows::Win32::System::WinRT::Graphics::Capture::IGraphicsCaptureItemInterop;
use windows::Win32::System::WinRT::{RoInitialize, RO_INIT_MULTITHREADED};

use super::window::{find_game_window, get_client_area_info};
use super::CaptureSource;
use crate::config::CaptureConfig;
use crate::log;

/// Captures the client area of the game window.
pub struct WindowCapture {
    process_name: String,
    frame_timeout: Duration,
}

impl WindowCapture {
    /// Initializes WinRT for this thread.
    pub fn new(config: &CaptureConfig) -> Result<Self> {
        unsafe { RoInitialize(RO_INIT_MULTITHREADED)? };
        Ok(Self {
            process_name: config.process_name.clone(),
            frame_timeout: Duration::from_millis(config.frame_timeout_ms),
        })
    }
}

impl CaptureSource for WindowCapture {
    fn capture(&mut self) -> Result<RgbImage> {
        let hwnd = find_game_window(&self.process_name)?;
        capture_window(hwnd, self.frame_timeout)
    }

    fn describe(&self) -> String {
        format!("live window of {}", self.process_name)
    }
}

/// Grabs one frame of `hwnd`, cropped to its client area.
///
/// 1. Creates a D3D11 device and a capture item for the window
/// 2. Waits for a single frame from a free-threaded frame pool
/// 3. Copies the frame to a CPU-readable staging texture
/// 4. Crops to the client area, converting BGRA to RGB
pub fn capture_window(hwnd: HWND, frame_timeout: Duration) -> Result<RgbImage> {
    let (client_rect, client_offset) = get_client_area_info(hwnd)?;
    let client_width = (client_rect.right - client_rect.left).max(0) as u32;
    let client_height = (client_rect.bottom - client_rect.top).max(0) as u32;
    log(&format!(
        "Client area: {}x{} at offset ({}, {})",
        client_width, client_height, client_offset.x, client_offset.y
    ));

    let (device, context) = create_d3d11_device()?;
    let item = create_capture_item(hwnd)?;
    let size = item.Size()?;

    let d3d_device = create_direct3d_device(&device)?;
    let frame_pool = Direct3D11CaptureFramePool::CreateFreeThreaded(
        &d3d_device,
        DirectXPixelFormat::B8G8R8A8UIntNormalized,
        1,
        size,
    )?;
    let session = frame_pool.CreateCaptureSession(&item)?;

    let frame_arrived = Arc::new(AtomicBool::new(false));
    let frame_arrived_clone = frame_arrived.clone();
    frame_pool.FrameArrived(&TypedEventHandler::new(
        move |_pool: &Option<Direct3D11CaptureFramePool>, _| {
            frame_arrived_clone.store(true, Ordering::SeqCst);
            Ok(())
        },
    ))?;

    session.StartCapture()?;

    let start = Instant::now();
    while !frame_arrived.load(Ordering::SeqCst) {
        if start.elapsed() > frame_timeout {
            let _ = session.Close();
            let _ = frame_pool.Close();
            return Err(anyhow!(
                "Timeout waiting for frame after {}ms",
                frame_timeout.as_millis()
            ));
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    let frame = frame_pool.TryGetNextFrame()?;
    let surface = frame.Surface()?;

    let access: windows::Win32::System::WinRT::Direct3D11::IDirect3DDxgiInterfaceAccess =
        surface.cast()?;
    let texture: ID3D11Texture2D = unsafe { access.GetInterface()? };

    let mut desc = D3D11_TEXTURE2D_DESC::default();
    unsafe { texture.GetDesc(&mut desc) };

    let staging_desc = D3D11_TEXTURE2D_DESC {
        Width: desc.Width,
        Height: desc.Height,
        MipLevels: 1,
        ArraySize: 1,
        Format: desc.Format,
        SampleDesc: desc.SampleDesc,
        Usage: D3D11_USAGE_STAGING,
        BindFlags: Default::default(),
        CPUAccessFlags: D3D11_CPU_ACCESS_READ.0 as u32,
        MiscFlags: Default::default(),
    };

    let staging_texture = unsafe {
        let mut staging: Option<ID3D11Texture2D> = None;
        device.CreateTexture2D(&staging_desc, None, Some(&mut staging))?;
        staging.ok_or_else(|| anyhow!("Failed to create staging texture"))?
    };

    unsafe {
        context.CopyResource(
            &staging_texture.cast::<ID3D11Resource>()?,
            &texture.cast::<ID3D11Resource>()?,
        );
    }

    let mapped = unsafe {
        let mut mapped = Default::default();
        context.Map(
            &staging_texture.cast::<ID3D11Resource>()?,
            0,
            D3D11_MAP_READ,
            0,
            Some(&mut mapped),
        )?;
        mapped
    };

    let crop_x = client_offset.x.max(0) as u32;
    let crop_y = client_offset.y.max(0) as u32;
    let crop_width = client_width.min(desc.Width.saturating_sub(crop_x));
    let crop_height = client_height.min(desc.Height.saturating_sub(crop_y));

    let src_data = unsafe {
        std::slice::from_raw_parts(
            mapped.pData as *const u8,
            (mapped.RowPitch * desc.Height) as usize,
        )
    };
    let row_pitch = mapped.RowPitch as usize;

    let img = RgbImage::from_fn(crop_width, crop_height, |x, y| {
        let offset = (crop_y + y) as usize * row_pitch + (crop_x + x) as usize * 4;
        // BGRA -> RGB
        Rgb([
            src_data[offset + 2],
            src_data[offset + 1],
            src_data[offset],
        ])
    });

    unsafe {
        context.Unmap(&staging_texture.cast::<ID3D11Resource>()?, 0);
    }

    session.Close()?;
    frame_pool.Close()?;

    log(&format!("Captured {}x{} frame", crop_width, crop_height));
    Ok(img)
}

fn create_d3d11_device() -> Result<(ID3D11Device, ID3D11DeviceContext)> {
    let mut device: Option<ID3D11Device> = None;
    let mut context: Option<ID3D11DeviceContext> = None;

    unsafe {
        D3D11CreateDevice(
            None,
            D3D_DRIVER_TYPE_HARDWARE,
            None,
            D3D11_CREATE_DEVICE_BGRA_SUPPORT,
            None,
            D3D11_SDK_VERSION,
            Some(&mut device),
            None,
            Some(&mut context),
        )?;
    }

    Ok((
        device.ok_or_else(|| anyhow!("Failed to create D3D11 device"))?,
        context.ok_or_else(|| anyhow!("Failed to create D3D11 context"))?,
    ))
}

/// WinRT device wrapper required by the capture API.
fn create_direct3d_device(
    device: &ID3D11Device,
) -> Result<windows::Graphics::DirectX::Direct3D11::IDirect3DDevice> {
    let dxgi_device: windows::Win32::Graphics::Dxgi::IDXGIDevice = device.cast()?;
    let inspectable = unsafe { CreateDirect3D11DeviceFromDXGIDevice(&dxgi_device)? };
    inspectable
        .cast()
        .context("Failed to cast to IDirect3DDevice")
}

fn create_capture_item(hwnd: HWND) -> Result<GraphicsCaptureItem> {
    let class_name = windows::core::h!("Windows.Graphics.Capture.GraphicsCaptureItem");
    let interop: IGraphicsCaptureItemInterop = unsafe {
        windows::Win32::System::WinRT::RoGetActivationFactory(class_name)
            .context("Failed to get IGraphicsCaptureItemInterop")?
    };

    unsafe {
        interop
            .CreateForWindow(hwnd)
            .context("Failed to create capture item for window")
    }
}
